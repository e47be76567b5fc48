// Table rows -> engine records

use rimtrack_recon::{Action, Event, FleetMileageTable};
use tracing::warn;

use crate::config::{EventColumns, MileageColumns};
use crate::error::IoError;
use crate::table::{cell, Table};

/// Convert the event sheet into engine events. Rows with no serial number
/// are skipped with a warning; bad dates or mileages are errors.
pub fn events_from_table(
    table: &Table,
    columns: &EventColumns,
    warnings: &mut Vec<String>,
) -> Result<Vec<Event>, IoError> {
    let serial_idx = table.column(&columns.serial)?;
    let date_idx = table.column(&columns.requested_date)?;
    let action_idx = table.column(&columns.action)?;
    let train_idx = table.column(&columns.train)?;
    let car_idx = table.column(&columns.car)?;
    let position_idx = table.column(&columns.position)?;
    let mileage_idx = table.column(&columns.mileage)?;

    let mut events = Vec::with_capacity(table.rows.len());

    for (i, row) in table.rows.iter().enumerate() {
        let row_no = table.row_number(i);

        let Some(asset_id) = cell(row, serial_idx).as_text() else {
            if row.iter().any(|c| c.as_text().is_some()) {
                let msg = format!("sheet '{}', row {row_no}: no {}; row skipped", table.name, columns.serial);
                warn!("{msg}");
                warnings.push(msg);
            }
            continue;
        };

        let timestamp = cell(row, date_idx).as_datetime().map_err(|value| IoError::DateParse {
            sheet: table.name.clone(),
            row: row_no,
            value,
        })?;

        let mileage = cell(row, mileage_idx)
            .as_number()
            .and_then(|v| v.ok_or_else(String::new))
            .map_err(|value| IoError::NumberParse {
                sheet: table.name.clone(),
                row: row_no,
                column: columns.mileage.clone(),
                value,
            })?;

        let action = Action::parse(&cell(row, action_idx).as_text().unwrap_or_default());

        events.push(Event {
            asset_id,
            timestamp,
            action,
            train_id: cell(row, train_idx).as_text(),
            car: cell(row, car_idx).as_text(),
            position: cell(row, position_idx).as_text(),
            train_mileage_at_event: mileage,
        });
    }

    Ok(events)
}

/// Convert the mileage sheet into a fleet table. Trains with a blank
/// mileage are skipped with a warning; the first row for a train wins.
pub fn fleet_from_table(
    table: &Table,
    columns: &MileageColumns,
    warnings: &mut Vec<String>,
) -> Result<FleetMileageTable, IoError> {
    let train_idx = table.column(&columns.train)?;
    let mileage_idx = table.column(&columns.mileage)?;

    let mut fleet = FleetMileageTable::new();

    for (i, row) in table.rows.iter().enumerate() {
        let row_no = table.row_number(i);
        let Some(train) = cell(row, train_idx).as_text() else {
            continue;
        };

        let mileage = cell(row, mileage_idx).as_number().map_err(|value| IoError::NumberParse {
            sheet: table.name.clone(),
            row: row_no,
            column: columns.mileage.clone(),
            value,
        })?;

        match mileage {
            Some(mileage) => {
                if !fleet.insert(&train, mileage) {
                    let msg = format!("sheet '{}', row {row_no}: train {train} listed twice; first value kept", table.name);
                    warn!("{msg}");
                    warnings.push(msg);
                }
            }
            None => {
                let msg = format!("sheet '{}', row {row_no}: train {train} has no mileage; skipped", table.name);
                warn!("{msg}");
                warnings.push(msg);
            }
        }
    }

    Ok(fleet)
}
