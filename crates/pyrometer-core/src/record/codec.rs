//! Result line encoding and decoding

use super::{RecordError, ResultRecord, DELIMITER};
use crate::profile::{MAX_POSITIONS, MAX_WHEELS};

const ESCAPE: char = '\\';

/// Shortest decimal that reads back to the same value, always with a
/// fractional part (`80.0`, `80.25`).
pub(crate) fn format_temperature(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

fn escape(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    for c in field.chars() {
        if c == DELIMITER || c == ESCAPE {
            out.push(ESCAPE);
        }
        out.push(c);
    }
    out
}

/// Split on unescaped delimiters, removing escapes
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        if c == ESCAPE {
            match chars.next() {
                Some(next) => current.push(next),
                None => current.push(ESCAPE),
            }
        } else if c == DELIMITER {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    fields.push(current);
    fields
}

pub(super) fn encode(record: &ResultRecord) -> String {
    let mut fields: Vec<String> = Vec::with_capacity(
        4 + record.temperatures.len()
            + record.wheel_names.len()
            + record.position_names.len()
            + record.max_temps.len(),
    );

    fields.push(escape(&record.timestamp));
    fields.push(escape(&record.vehicle_name));
    fields.push(record.wheel_count.to_string());
    fields.push(record.position_count.to_string());
    fields.extend(record.temperatures.iter().map(|t| format_temperature(*t)));
    fields.extend(record.wheel_names.iter().map(|n| escape(n)));
    fields.extend(record.position_names.iter().map(|n| escape(n)));
    fields.extend(record.max_temps.iter().map(|t| format_temperature(*t)));

    fields.join(&DELIMITER.to_string())
}

fn parse_count(field: &'static str, value: &str, max: usize) -> Result<usize, RecordError> {
    value
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=max).contains(n))
        .ok_or_else(|| RecordError::BadCount {
            field,
            value: value.to_string(),
        })
}

fn parse_numbers(fields: &[String], offset: usize) -> Result<Vec<f64>, RecordError> {
    fields
        .iter()
        .enumerate()
        .map(|(i, value)| {
            value
                .trim()
                .parse::<f64>()
                .map_err(|_| RecordError::BadNumber {
                    index: offset + i,
                    value: value.clone(),
                })
        })
        .collect()
}

pub(super) fn decode(line: &str) -> Result<ResultRecord, RecordError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let mut fields = split_fields(line);

    if fields.len() < 4 {
        return Err(RecordError::Truncated(fields.len()));
    }

    let wheels = parse_count("wheel", &fields[2], MAX_WHEELS)?;
    let positions = parse_count("position", &fields[3], MAX_POSITIONS)?;
    let expected = 4 + wheels * positions + wheels + positions + wheels;

    // Older firmware terminated every field, leaving one empty field at the end
    if fields.len() == expected + 1 && fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }
    if fields.len() != expected {
        return Err(RecordError::CountMismatch {
            wheels,
            positions,
            expected,
            found: fields.len(),
        });
    }

    let temps_start = 4;
    let wheel_names_start = temps_start + wheels * positions;
    let position_names_start = wheel_names_start + wheels;
    let max_temps_start = position_names_start + positions;

    let temperatures = parse_numbers(&fields[temps_start..wheel_names_start], temps_start)?;
    let max_temps = parse_numbers(&fields[max_temps_start..], max_temps_start)?;

    Ok(ResultRecord {
        timestamp: fields[0].clone(),
        vehicle_name: fields[1].clone(),
        wheel_count: wheels,
        position_count: positions,
        temperatures,
        wheel_names: fields[wheel_names_start..position_names_start].to_vec(),
        position_names: fields[position_names_start..max_temps_start].to_vec(),
        max_temps,
    })
}
