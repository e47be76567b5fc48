use serde::Deserialize;

use crate::error::IoError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Where to find events and fleet mileage in the input, and what the
/// columns are called. Every field has a default matching the standard
/// `LoadWheelData` / `LatestMileage` workbook layout.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IngestConfig {
    #[serde(default)]
    pub sheets: SheetNames,
    #[serde(default)]
    pub events: EventColumns,
    #[serde(default)]
    pub mileage: MileageColumns,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SheetNames {
    pub events: String,
    pub mileage: String,
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            events: "LoadWheelData".into(),
            mileage: "LatestMileage".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Column mapping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EventColumns {
    pub serial: String,
    pub requested_date: String,
    pub action: String,
    pub train: String,
    pub car: String,
    pub position: String,
    pub mileage: String,
}

impl Default for EventColumns {
    fn default() -> Self {
        Self {
            serial: "SerialNumber".into(),
            requested_date: "Requested_Date".into(),
            action: "Action".into(),
            train: "Train".into(),
            car: "Car".into(),
            position: "Position".into(),
            mileage: "Train_Mileage_at_Installation".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MileageColumns {
    pub train: String,
    pub mileage: String,
}

impl Default for MileageColumns {
    fn default() -> Self {
        Self {
            train: "Train".into(),
            mileage: "Mileage".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl IngestConfig {
    pub fn from_toml(input: &str) -> Result<Self, IoError> {
        let config: IngestConfig =
            toml::from_str(input).map_err(|e| IoError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), IoError> {
        let names = [
            ("sheets.events", &self.sheets.events),
            ("sheets.mileage", &self.sheets.mileage),
            ("events.serial", &self.events.serial),
            ("events.requested_date", &self.events.requested_date),
            ("events.action", &self.events.action),
            ("events.train", &self.events.train),
            ("events.car", &self.events.car),
            ("events.position", &self.events.position),
            ("events.mileage", &self.events.mileage),
            ("mileage.train", &self.mileage.train),
            ("mileage.mileage", &self.mileage.mileage),
        ];

        for (key, value) in names {
            if value.trim().is_empty() {
                return Err(IoError::ConfigValidation(format!("{key} must not be empty")));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
