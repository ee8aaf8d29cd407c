//! Interactive Operator Form
//!
//! Prompts for one input set at a time on any `BufRead`/`Write` pair and
//! shows the outcome of each prediction. The heart rate and body
//! temperature fields carry their own view state: picking "Enter Manually"
//! switches the field to manual mode, which is the only time the manual
//! prompt is shown.

use crate::service::{DisplayMessage, PredictionService};
use feature_assembler::{Bucket, ConditionalInput, RawInputSet};
use std::io::{self, BufRead, Write};
use tracing::debug;

/// Whether a conditional field shows the bucket menu or the manual entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldMode {
    #[default]
    Categorical,
    Manual,
}

/// View state of one conditional field
#[derive(Debug, Clone, Default)]
pub struct ConditionalField {
    selection: String,
    manual: String,
    mode: FieldMode,
}

impl ConditionalField {
    /// Selection change callback: toggles between menu and manual entry
    pub fn select(&mut self, selection: &str) {
        self.selection = selection.to_string();
        self.mode = if selection == Bucket::EnterManually.as_str() {
            FieldMode::Manual
        } else {
            FieldMode::Categorical
        };
    }

    /// Update the manual entry text
    pub fn set_manual(&mut self, text: &str) {
        self.manual = text.to_string();
    }

    pub fn mode(&self) -> FieldMode {
        self.mode
    }

    pub fn selection(&self) -> &str {
        &self.selection
    }

    /// Current values, as handed to the assembler
    pub fn to_input(&self) -> ConditionalInput {
        ConditionalInput {
            selection: self.selection.clone(),
            manual: self.manual.clone(),
        }
    }
}

/// Map a menu answer to a selector label
///
/// Accepts the menu number or the label in any case. Anything else is passed
/// through unchanged so the assembler can reject it.
pub fn menu_choice(answer: &str) -> String {
    let answer = answer.trim();

    if let Ok(number) = answer.parse::<usize>() {
        if let Some(bucket) = number.checked_sub(1).and_then(|idx| Bucket::ALL.get(idx)) {
            return bucket.as_str().to_string();
        }
    }

    Bucket::ALL
        .iter()
        .find(|bucket| bucket.as_str().eq_ignore_ascii_case(answer))
        .map(|bucket| bucket.as_str().to_string())
        .unwrap_or_else(|| answer.to_string())
}

#[derive(Debug, Clone, Copy)]
enum Conditional {
    HeartRate,
    BodyTemperature,
}

/// Line-oriented form collecting raw inputs and showing results
pub struct Form<R, W> {
    reader: R,
    writer: W,
    heart_rate: ConditionalField,
    body_temperature: ConditionalField,
}

impl<R: BufRead, W: Write> Form<R, W> {
    /// Create a form over the given input and output
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            heart_rate: ConditionalField::default(),
            body_temperature: ConditionalField::default(),
        }
    }

    /// Current view state of a conditional field
    pub fn heart_rate(&self) -> &ConditionalField {
        &self.heart_rate
    }

    pub fn body_temperature(&self) -> &ConditionalField {
        &self.body_temperature
    }

    /// Run prediction rounds until the input ends, returning the number of rounds
    pub fn run(&mut self, service: &PredictionService) -> io::Result<usize> {
        writeln!(self.writer, "Calories Burned Predictor")?;
        writeln!(self.writer, "Press Ctrl-D to quit.")?;

        let mut rounds = 0;
        while let Some(raw) = self.collect()? {
            let message = service.handle(&raw);
            self.show(&message)?;
            rounds += 1;
        }

        debug!("Form closed after {} rounds", rounds);
        Ok(rounds)
    }

    /// Prompt for one complete input set, `None` once the input ends
    pub fn collect(&mut self) -> io::Result<Option<RawInputSet>> {
        writeln!(self.writer)?;

        let Some(gender) = self.prompt("Gender (Male/Female)")? else {
            return Ok(None);
        };
        let Some(age) = self.prompt("Age")? else {
            return Ok(None);
        };
        let Some(height) = self.prompt("Height (in cm)")? else {
            return Ok(None);
        };
        let Some(weight) = self.prompt("Weight (in kg)")? else {
            return Ok(None);
        };
        let Some(duration) = self.prompt("Exercise Duration (in minutes)")? else {
            return Ok(None);
        };
        if !self.prompt_conditional("Heart Rate", Conditional::HeartRate)? {
            return Ok(None);
        }
        if !self.prompt_conditional("Body Temperature", Conditional::BodyTemperature)? {
            return Ok(None);
        }

        Ok(Some(RawInputSet {
            gender,
            age,
            height,
            weight,
            duration,
            heart_rate: self.heart_rate.to_input(),
            body_temperature: self.body_temperature.to_input(),
        }))
    }

    /// Show the outcome of a prediction
    pub fn show(&mut self, message: &DisplayMessage) -> io::Result<()> {
        writeln!(self.writer, "[{}] {}", message.title, message.body)?;
        self.writer.flush()
    }

    fn field_mut(&mut self, which: Conditional) -> &mut ConditionalField {
        match which {
            Conditional::HeartRate => &mut self.heart_rate,
            Conditional::BodyTemperature => &mut self.body_temperature,
        }
    }

    /// Prompt for a menu choice, then for the manual value in manual mode
    fn prompt_conditional(&mut self, label: &str, which: Conditional) -> io::Result<bool> {
        let menu = Bucket::ALL
            .iter()
            .enumerate()
            .map(|(idx, bucket)| format!("{}) {}", idx + 1, bucket.as_str()))
            .collect::<Vec<_>>()
            .join("  ");

        let Some(answer) = self.prompt(&format!("{} [{}]", label, menu))? else {
            return Ok(false);
        };
        self.field_mut(which).select(&menu_choice(&answer));

        if self.field_mut(which).mode() == FieldMode::Manual {
            let Some(text) = self.prompt(&format!("{} (manual entry)", label))? else {
                return Ok(false);
            };
            self.field_mut(which).set_manual(&text);
        }

        Ok(true)
    }

    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.writer, "{}: ", label)?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_toggle_to_manual_and_back() {
        let mut field = ConditionalField::default();
        assert_eq!(field.mode(), FieldMode::Categorical);

        field.select("Enter Manually");
        assert_eq!(field.mode(), FieldMode::Manual);
        field.set_manual("88");

        field.select("High");
        assert_eq!(field.mode(), FieldMode::Categorical);
        assert_eq!(field.selection(), "High");

        // Manual text stays around but the selector decides
        let input = field.to_input();
        assert_eq!(input.selection, "High");
        assert_eq!(input.manual, "88");
    }

    #[test]
    fn test_menu_choice() {
        assert_eq!(menu_choice("1"), "Low");
        assert_eq!(menu_choice(" 4 "), "Enter Manually");
        assert_eq!(menu_choice("medium"), "Medium");
        assert_eq!(menu_choice("enter manually"), "Enter Manually");
        assert_eq!(menu_choice("0"), "0");
        assert_eq!(menu_choice("9"), "9");
        assert_eq!(menu_choice("Scorching"), "Scorching");
    }

    #[test]
    fn test_collect_bucket_and_manual() {
        let input = "female\n30\n170\n65\n20\n4\n88\n3\n";
        let mut output = Vec::new();
        let mut form = Form::new(Cursor::new(input), &mut output);

        let raw = form.collect().unwrap().unwrap();
        assert_eq!(raw.gender, "female");
        assert_eq!(raw.duration, "20");
        assert_eq!(raw.heart_rate, ConditionalInput::manual("88"));
        assert_eq!(raw.body_temperature.selection, "High");
        assert_eq!(form.heart_rate().mode(), FieldMode::Manual);
        assert_eq!(form.body_temperature().mode(), FieldMode::Categorical);

        drop(form);
        let shown = String::from_utf8(output).unwrap();
        assert!(shown.contains("Heart Rate (manual entry): "));
        assert!(!shown.contains("Body Temperature (manual entry)"));
    }

    #[test]
    fn test_collect_stops_at_end_of_input() {
        let mut output = Vec::new();
        let mut form = Form::new(Cursor::new("male\n40\n"), &mut output);
        assert!(form.collect().unwrap().is_none());
    }

    #[test]
    fn test_collect_keeps_raw_text() {
        let input = "  Male \r\n abc\n180\n80\n30\n2\n1\n";
        let mut output = Vec::new();
        let mut form = Form::new(Cursor::new(input), &mut output);

        let raw = form.collect().unwrap().unwrap();
        assert_eq!(raw.gender, "  Male ");
        assert_eq!(raw.age, " abc");
    }
}
