use std::time::Duration;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use super::profile::TextStats;

/// Elapsed time per pipeline phase.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Timings {
    pub extraction: Duration,
    pub inference: Duration,
    pub total: Duration,
}

impl Timings {
    pub fn extraction_secs(&self) -> f64 {
        self.extraction.as_secs_f64()
    }

    pub fn inference_secs(&self) -> f64 {
        self.inference.as_secs_f64()
    }

    pub fn total_secs(&self) -> f64 {
        self.total.as_secs_f64()
    }
}

/// Serialized as fractional seconds.
impl Serialize for Timings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Timings", 3)?;
        state.serialize_field("extraction_secs", &self.extraction_secs())?;
        state.serialize_field("inference_secs", &self.inference_secs())?;
        state.serialize_field("total_secs", &self.total_secs())?;
        state.end()
    }
}

/// Render the result shown to the user: timings, document statistics, then
/// the model's answer (or the error text standing in for it).
pub fn format_result(stats: &TextStats, analysis: &str, timings: &Timings) -> String {
    format!(
        "Processing time: extraction {extraction:.2}s, inference {inference:.2}s, total {total:.2}s\n\
         Document: {words} words, {chars} characters, language {language}, reading level {reading:.1}\n\
         \n\
         {analysis}",
        extraction = timings.extraction_secs(),
        inference = timings.inference_secs(),
        total = timings.total_secs(),
        words = stats.word_count,
        chars = stats.char_count,
        language = stats.language.to_uppercase(),
        reading = stats.reading_level,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timings() -> Timings {
        Timings {
            extraction: Duration::from_millis(123),
            inference: Duration::from_millis(3_456),
            total: Duration::from_millis(3_600),
        }
    }

    #[test]
    fn fixed_order_and_precision() {
        let stats = TextStats {
            word_count: 120,
            char_count: 700,
            reading_level: 55.54,
            language: "fr".into(),
        };
        let out = format_result(&stats, "The document is a report.", &timings());
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(
            lines[0],
            "Processing time: extraction 0.12s, inference 3.46s, total 3.60s"
        );
        assert!(lines[1].starts_with("Document: 120 words, 700 characters, language FR"));
        assert!(lines[1].ends_with("reading level 55.5"));
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "The document is a report.");
    }

    #[test]
    fn unknown_language_uppercased() {
        let out = format_result(&TextStats::default(), "x", &Timings::default());
        assert!(out.contains("language UNKNOWN"));
        assert!(out.contains("reading level 0.0"));
        assert!(out.contains("extraction 0.00s, inference 0.00s, total 0.00s"));
    }

    #[test]
    fn timings_serialize_as_seconds() {
        let json = serde_json::to_value(timings()).unwrap();
        let total = json["total_secs"].as_f64().unwrap();
        assert!((total - 3.6).abs() < 1e-9);
        assert!(json["inference_secs"].is_f64());
        assert!(json.get("extraction").is_none());
    }

    #[test]
    fn error_text_passes_through() {
        let err = "Error: Ollama API returned status 500";
        let out = format_result(&TextStats::default(), err, &timings());
        assert!(out.ends_with(err));
    }
}
