use crate::{
    DecodedFields, DialectRegistry, DsvEnum, DsvFormat, DsvRecord, FieldKind, Schema, SchemaError,
    Value, from_csv_str, to_csv_string,
};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Level {
    Low,
    High,
}

impl DsvEnum for Level {
    const NAME: &'static str = "Level";
    const VARIANTS: &'static [&'static str] = &["Low", "High"];

    fn ordinal(&self) -> usize {
        *self as usize
    }

    fn from_ordinal(ordinal: usize) -> Option<Self> {
        match ordinal {
            0 => Some(Level::Low),
            1 => Some(Level::High),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Reading {
    sensor_name: String,
    value: f64,
    level: Level,
    note: Option<String>,
}

impl DsvRecord for Reading {
    fn schema() -> Schema {
        Schema::builder("Reading")
            .scalar::<String>("sensorName")
            .scalar::<f64>("value")
            .field("level", FieldKind::enum_of::<Level>())
            .scalar::<Option<String>>("note")
            .build()
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            self.sensor_name.clone().into(),
            self.value.into(),
            Value::enumeration(&self.level),
            self.note.clone().into(),
        ]
    }

    fn from_values(mut fields: DecodedFields<'_>) -> Result<Self, SchemaError> {
        Ok(Reading {
            sensor_name: fields.get(0)?,
            value: fields.get(1)?,
            level: fields.get_enum(2)?,
            note: fields.get(3)?,
        })
    }
}

fn readings() -> Vec<Reading> {
    vec![
        Reading {
            sensor_name: "north, roof".to_string(),
            value: -3.25,
            level: Level::Low,
            note: None,
        },
        Reading {
            sensor_name: "south|\"yard\"".to_string(),
            value: 1e-9,
            level: Level::High,
            note: Some("line one\nline two\ttabbed; done".to_string()),
        },
    ]
}

fn get_format(name: &str) -> DsvFormat {
    let config = DialectRegistry::load_default().unwrap();
    config.get_dialect(name).unwrap().format().unwrap()
}

#[test]
fn test_round_trip_every_bundled_dialect() {
    let config = DialectRegistry::load_default().unwrap();
    for name in config.dialects.keys() {
        let format = get_format(name);
        let text = format.encode_to_string(&readings()).unwrap();
        let decoded: Vec<Reading> = format.decode_from_str(&text).unwrap();
        assert_eq!(decoded, readings(), "dialect {}", name);
    }
}

#[test]
fn test_title_case_header() {
    let text = get_format("excel_titles").encode_to_string(&readings()[..1]).unwrap();
    assert!(text.starts_with("Sensor Name,Value,Level,Note\r\n"));
}

#[test]
fn test_enums_by_ordinal() {
    let format = DsvFormat::csv().with_enums_by_name(false);
    let text = format.encode_to_string(&readings()[..1]).unwrap();
    assert_eq!(text, "sensorName,value,level,note\n\"north, roof\",-3.25,0,\n");
    assert_eq!(format.decode_from_str::<Reading>(&text).unwrap(), readings()[..1]);
}

#[test]
fn test_top_level_helpers() {
    let text = to_csv_string(&readings()).unwrap();
    assert_eq!(from_csv_str::<Reading>(&text).unwrap(), readings());
}

#[test]
fn test_lazy_matches_eager() {
    let format = get_format("tsv");
    let eager = format.encode_to_string(&readings()).unwrap();
    let lazy = format.encode_iter(readings(), Vec::new()).unwrap();
    assert_eq!(eager.as_bytes(), lazy.as_slice());

    let decoded: Vec<Reading> = format
        .decode_iter(lazy.as_slice())
        .unwrap()
        .collect::<crate::Result<_>>()
        .unwrap();
    assert_eq!(decoded, readings());
}
