//! Common test utilities for survey-stats tests

#![allow(dead_code)]

use survey_stats::{load_csv_reader, Dataset, Schema};

/// One airline survey response; service ratings are all 3.
#[derive(Clone)]
pub struct Response {
    pub satisfaction: &'static str,
    pub class: &'static str,
    pub age: u32,
    pub distance: u32,
    pub departure_delay: f64,
    pub arrival_delay: Option<f64>,
}

impl Response {
    pub fn new(age: u32, distance: u32, departure_delay: f64, arrival_delay: Option<f64>) -> Self {
        Response {
            satisfaction: "satisfied",
            class: "Eco",
            age,
            distance,
            departure_delay,
            arrival_delay,
        }
    }

    pub fn class(mut self, class: &'static str) -> Self {
        self.class = class;
        self
    }

    pub fn satisfaction(mut self, satisfaction: &'static str) -> Self {
        self.satisfaction = satisfaction;
        self
    }

    fn to_csv_line(&self) -> String {
        let mut cells = vec![
            self.satisfaction.to_string(),
            "Female".to_string(),
            "Loyal Customer".to_string(),
            self.age.to_string(),
            "Business travel".to_string(),
            self.class.to_string(),
            self.distance.to_string(),
        ];
        cells.extend(std::iter::repeat("3".to_string()).take(14));
        cells.push(self.departure_delay.to_string());
        cells.push(self.arrival_delay.map(|v| v.to_string()).unwrap_or_default());
        cells.join(",")
    }
}

/// CSV text with the airline header and one line per response.
pub fn airline_csv(responses: &[Response]) -> String {
    let schema = Schema::airline();
    let header: Vec<&str> = schema
        .fields()
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    let mut out = header.join(",");
    out.push('\n');
    for r in responses {
        out.push_str(&r.to_csv_line());
        out.push('\n');
    }
    out
}

/// Load responses through the CSV loader with the airline schema.
pub fn airline_dataset(responses: &[Response]) -> Dataset {
    load_csv_reader(airline_csv(responses).as_bytes(), Some(&Schema::airline())).unwrap()
}
