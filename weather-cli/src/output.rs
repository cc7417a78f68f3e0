use chrono::{DateTime, Local, TimeZone};
use city_weather_core::{
    City, FormatError, HistoricalEntry, WeatherSnapshot, capitalize_first, format_date,
    format_historical_date, icon_url, kelvin_to_celsius,
};

const NO_CITIES: &str = "No saved cities. Add one with `cityweather add <city>`.\n";

pub fn city_list(cities: &[City]) -> String {
    if cities.is_empty() {
        return NO_CITIES.to_string();
    }

    cities
        .iter()
        .map(|c| format!("{}, {}\n", c.name, c.country))
        .collect()
}

/// Saved cities with the time each was last refreshed, if ever.
pub fn saved_cities(rows: &[(City, Option<DateTime<Local>>)]) -> Result<String, FormatError> {
    if rows.is_empty() {
        return Ok(NO_CITIES.to_string());
    }

    let mut out = String::new();
    for (city, updated) in rows {
        let line = match updated {
            Some(at) => format!(
                "{}, {}  (last updated {})\n",
                city.name,
                city.country,
                format_date(at)?
            ),
            None => format!("{}, {}  (no data yet)\n", city.name, city.country),
        };
        out.push_str(&line);
    }

    Ok(out)
}

fn describe(snapshot: &WeatherSnapshot) -> String {
    snapshot
        .primary_condition()
        .map(|c| capitalize_first(&c.description))
        .unwrap_or_else(|| "Unknown".to_string())
}

pub fn detail<Tz: TimeZone>(
    city: &str,
    snapshot: &WeatherSnapshot,
    fetched_at: &DateTime<Tz>,
) -> Result<String, FormatError> {
    let main = snapshot.main();
    let mut lines = vec![
        format!("{}, {}", snapshot.name(), snapshot.country()),
        format!("  {}°C  {}", kelvin_to_celsius(main.temp), describe(snapshot)),
        format!("  Feels like: {}°C", kelvin_to_celsius(main.feels_like)),
        format!("  Humidity:   {}%", main.humidity),
        format!("  Pressure:   {} hPa", main.pressure),
        format!("  Wind:       {:.1} m/s", snapshot.wind().speed),
    ];
    if let Some(condition) = snapshot.primary_condition() {
        lines.push(format!("  Icon:       {}", icon_url(&condition.icon)));
    }
    lines.push(format!(
        "\nWeather information for {city} received on {}",
        format_date(fetched_at)?
    ));

    Ok(lines.join("\n") + "\n")
}

pub fn history(city: &str, entries: &[HistoricalEntry]) -> Result<String, FormatError> {
    if entries.is_empty() {
        return Ok(format!("No weather recorded for {city} yet.\n"));
    }

    let mut out = String::new();
    for entry in entries {
        let local = entry.timestamp.with_timezone(&Local);
        out.push_str(&format!(
            "{}  {:>4}°C  {}\n",
            format_historical_date(&local)?,
            kelvin_to_celsius(entry.data.main().temp),
            describe(&entry.data)
        ));
    }

    Ok(out)
}
