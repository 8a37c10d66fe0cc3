#![allow(dead_code)]

/// Two preamble lines as the portal sends them ahead of the data rows
pub const PREAMBLE: &str = "GreenFeed Summarized Data\nFeederID,AnimalName,RFID,StartTime,EndTime,GoodDataDuration,CO2GramsPerDay,CH4GramsPerDay,O2GramsPerDay,H2GramsPerDay,H2SGramsPerDay,AirflowLitersPerSec,AirflowCf,WindSpeedMetersPerSec,WindDirDeg,WindCf,WasInterrupted,InterruptingTags,TempPipeDegreesCelsius,IsPreliminary,RunTime\n";

/// A 21-column data row with the given feeder ID, animal name and interrupting tags cell
pub fn sample_row(feeder: &str, animal: &str, tags: &str) -> String {
    [
        feeder,
        animal,
        "840003123456789",
        "2024-01-05 08:12:44",
        "2024-01-05 08:17:02",
        "00:04:18",
        "11823.4",
        "412.7",
        "8531.2",
        "0.91",
        "0.02",
        "27.5",
        "0.98",
        "1.2",
        "184",
        "0.93",
        "0",
        tags,
        "21.4",
        "0",
        "00:04:18",
    ]
    .join(",")
}

/// Full data response: preamble followed by the given rows
pub fn sample_response(rows: &[String]) -> String {
    let mut body = PREAMBLE.to_string();
    for row in rows {
        body.push_str(row);
        body.push('\n');
    }
    body
}
