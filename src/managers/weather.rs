use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::error::{BotError, Result};

pub const OPENWEATHER_URL: &str = "https://api.openweathermap.org";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Current conditions in a city
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub city: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    /// OpenWeatherMap condition group ("Clear", "Rain", ...)
    pub condition: String,
    pub sunrise: DateTime<FixedOffset>,
    pub sunset: DateTime<FixedOffset>,
}

impl WeatherReport {
    pub fn render(&self, now: NaiveDateTime) -> String {
        let wind = self.wind_speed.round() as i64;
        let day = self.sunset - self.sunrise;
        let day_secs = day.num_seconds().max(0);

        format!(
            "{}\nСейчас в городе {} {} °C\n{}\nОщущается как {} °C\n\
             Ветер: {} м/с\n{}\n\
             Влажность: {}%\n\
             Максимальная температура: {}°C\n\
             Минимальная температура: {}°C\n\
             Восход солнца: {}\n\
             Заход солнца: {}\n\
             Продолжительность дня: {}:{:02}:{:02}\n\
             Хорошего дня!",
            now.format("%Y-%m-%d %H:%M"),
            self.city,
            self.temperature.round() as i64,
            condition_label(&self.condition),
            self.feels_like.round() as i64,
            wind,
            wind_advice(wind),
            self.humidity.round() as i64,
            self.temp_max.round() as i64,
            self.temp_min.round() as i64,
            self.sunrise.format("%Y-%m-%d %H:%M:%S"),
            self.sunset.format("%Y-%m-%d %H:%M:%S"),
            day_secs / 3600,
            day_secs % 3600 / 60,
            day_secs % 60,
        )
    }
}

fn condition_label(condition: &str) -> &'static str {
    match condition {
        "Clear" => "Ясно \u{2600}",
        "Clouds" => "Облачно \u{2601}",
        "Rain" | "Drizzle" => "Дождь \u{2614}",
        "Thunderstorm" => "Гроза \u{26A1}",
        "Snow" => "Снег \u{1F328}",
        "Mist" => "Туман \u{1F32B}",
        _ => " ",
    }
}

fn wind_advice(speed: i64) -> &'static str {
    match speed {
        s if s < 5 => "✅ Погода хорошая, ветра почти нет",
        s if s < 10 => "🤔 На улице ветрено, оденьтесь чуть теплее",
        s if s < 20 => "❗️ Ветер очень сильный, будьте осторожны, выходя из дома",
        _ => "❌ На улице шторм, на улицу лучше не выходить",
    }
}

#[async_trait]
pub trait WeatherService: Send + Sync {
    async fn current(&self, city: &str) -> Result<WeatherReport>;
}

pub type SharedWeatherService = Arc<dyn WeatherService>;

/// OpenWeatherMap "current weather" client
pub struct OpenWeatherClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenWeatherClient {
    pub fn new(api_key: &str) -> Result<Self> {
        Self::with_base_url(api_key, OPENWEATHER_URL)
    }

    pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl WeatherService for OpenWeatherClient {
    async fn current(&self, city: &str) -> Result<WeatherReport> {
        debug!("Requesting weather for '{}'", city);
        let body: serde_json::Value = self
            .http
            .get(format!("{}/data/2.5/weather", self.base_url))
            .query(&[
                ("q", city),
                ("units", "metric"),
                ("lang", "ru"),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await?
            .json()
            .await?;

        parse_report(city, body)
    }
}

#[derive(Deserialize)]
struct ApiResponse {
    main: ApiMain,
    wind: ApiWind,
    sys: ApiSys,
    #[serde(default)]
    weather: Vec<ApiCondition>,
    #[serde(default)]
    timezone: i32,
}

#[derive(Deserialize)]
struct ApiMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: f64,
}

#[derive(Deserialize)]
struct ApiWind {
    speed: f64,
}

#[derive(Deserialize)]
struct ApiSys {
    sunrise: i64,
    sunset: i64,
}

#[derive(Deserialize)]
struct ApiCondition {
    main: String,
}

fn parse_report(city: &str, body: serde_json::Value) -> Result<WeatherReport> {
    // "cod" is a string on errors and a number on success
    if body.get("cod").and_then(|c| c.as_str()) == Some("404") {
        let message = body
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("city not found")
            .to_string();
        return Err(BotError::CityNotFound { message });
    }

    let api: ApiResponse = serde_json::from_value(body).map_err(|e| BotError::Weather {
        message: format!("unexpected response: {}", e),
    })?;

    let offset = FixedOffset::east_opt(api.timezone).ok_or_else(|| BotError::Weather {
        message: format!("invalid timezone offset {}", api.timezone),
    })?;
    let at = |secs: i64| {
        DateTime::<Utc>::from_timestamp(secs, 0)
            .map(|t| t.with_timezone(&offset))
            .ok_or_else(|| BotError::Weather {
                message: format!("invalid timestamp {}", secs),
            })
    };

    Ok(WeatherReport {
        city: city.to_string(),
        temperature: api.main.temp,
        feels_like: api.main.feels_like,
        temp_min: api.main.temp_min,
        temp_max: api.main.temp_max,
        humidity: api.main.humidity,
        wind_speed: api.wind.speed,
        condition: api
            .weather
            .into_iter()
            .next()
            .map(|c| c.main)
            .unwrap_or_default(),
        sunrise: at(api.sys.sunrise)?,
        sunset: at(api.sys.sunset)?,
    })
}
