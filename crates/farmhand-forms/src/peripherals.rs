//! Edit state for the peripherals panel.
//!
//! A peripheral is a device wired to one of the controller's GPIO pins
//! (water valve, vacuum pump, lights). The panel lists them with an
//! editable label and pin per row; rows can be added, removed and
//! reordered while the panel is in editing mode.

use serde::{Deserialize, Serialize};

use crate::input::BufferedInput;
use crate::util::move_item;

/// A device attached to a numbered pin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peripheral {
    /// Server-side id; unset until the peripheral has been saved.
    #[serde(default)]
    pub id: Option<u32>,
    #[serde(default)]
    pub pin: Option<u32>,
    pub label: String,
}

impl Peripheral {
    pub fn new(label: impl Into<String>, pin: Option<u32>) -> Self {
        Self {
            id: None,
            pin,
            label: label.into(),
        }
    }
}

/// Edit state for one peripheral row: a buffered input per editable field.
///
/// The row owns no peripheral data. Field commits are applied to the
/// [`Peripheral`] passed into the blur handlers, which is where validation
/// of the buffered text happens: labels commit verbatim, pins must parse
/// as a pin number or the edit is dropped.
#[derive(Debug, Clone, Default)]
pub struct PeripheralForm {
    label_input: BufferedInput,
    pin_input: BufferedInput,
}

impl PeripheralForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focus_label(&mut self, peripheral: &Peripheral) {
        self.label_input.focus(&peripheral.label);
    }

    pub fn change_label(&mut self, text: impl Into<String>) {
        self.label_input.change(text);
    }

    pub fn blur_label(&mut self, peripheral: &mut Peripheral) {
        if let Some(label) = self.label_input.blur() {
            peripheral.label = label;
        }
    }

    pub fn display_label<'a>(&'a self, peripheral: &'a Peripheral) -> &'a str {
        self.label_input.display(&peripheral.label)
    }

    pub fn focus_pin(&mut self, peripheral: &Peripheral) {
        self.pin_input.focus(&committed_pin(peripheral));
    }

    pub fn change_pin(&mut self, text: impl Into<String>) {
        self.pin_input.change(text);
    }

    /// Applies a pin edit. Non-numeric drafts are rejected here rather than
    /// in the input itself; the committed pin stays as it was.
    pub fn blur_pin(&mut self, peripheral: &mut Peripheral) {
        let Some(buffer) = self.pin_input.blur() else {
            return;
        };

        match buffer.trim().parse() {
            Ok(pin) => peripheral.pin = Some(pin),
            Err(_) => {
                tracing::warn!(
                    label = %peripheral.label,
                    "ignoring non-numeric pin edit {buffer:?}",
                );
            }
        }
    }

    pub fn display_pin(&self, peripheral: &Peripheral) -> String {
        self.pin_input.display(&committed_pin(peripheral)).to_owned()
    }
}

fn committed_pin(peripheral: &Peripheral) -> String {
    peripheral.pin.map(|pin| pin.to_string()).unwrap_or_default()
}

/// The peripherals panel: the list plus its editing flag.
#[derive(Debug, Clone, Default)]
pub struct PeripheralList {
    peripherals: Vec<Peripheral>,
    is_editing: bool,
}

impl PeripheralList {
    pub fn new(peripherals: Vec<Peripheral>) -> Self {
        Self {
            peripherals,
            is_editing: false,
        }
    }

    pub fn peripherals(&self) -> &[Peripheral] {
        &self.peripherals
    }

    pub fn peripheral_mut(&mut self, index: usize) -> Option<&mut Peripheral> {
        self.peripherals.get_mut(index)
    }

    /// Whether the panel shows the editing controls.
    pub fn is_editing(&self) -> bool {
        self.is_editing
    }

    pub fn toggle_editing(&mut self) {
        self.is_editing = !self.is_editing;
    }

    pub fn push(&mut self, peripheral: Peripheral) {
        self.peripherals.push(peripheral);
    }

    pub fn remove(&mut self, index: usize) -> Option<Peripheral> {
        if index < self.peripherals.len() {
            Some(self.peripherals.remove(index))
        } else {
            None
        }
    }

    /// Moves a row to a new position, keeping the relative order of the
    /// other rows.
    pub fn move_to(&mut self, from: usize, to: usize) {
        self.peripherals = move_item(&self.peripherals, from, to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valve() -> Peripheral {
        Peripheral::new("Water Valve", Some(8))
    }

    #[test]
    fn label_edit_commits_to_owner() {
        let mut peripheral = valve();
        let mut form = PeripheralForm::new();

        form.focus_label(&peripheral);
        form.change_label("Vacuum Pump");
        assert_eq!(form.display_label(&peripheral), "Vacuum Pump");

        form.blur_label(&mut peripheral);
        assert_eq!(peripheral.label, "Vacuum Pump");
        assert_eq!(form.display_label(&peripheral), "Vacuum Pump");
    }

    #[test]
    fn empty_label_edit_reverts() {
        let mut peripheral = valve();
        let mut form = PeripheralForm::new();

        form.focus_label(&peripheral);
        form.change_label("");
        form.blur_label(&mut peripheral);

        assert_eq!(peripheral.label, "Water Valve");
    }

    #[test]
    fn pin_edit_parses_number() {
        let mut peripheral = valve();
        let mut form = PeripheralForm::new();

        form.focus_pin(&peripheral);
        assert_eq!(form.display_pin(&peripheral), "8");

        form.change_pin("13");
        form.blur_pin(&mut peripheral);
        assert_eq!(peripheral.pin, Some(13));
    }

    #[test]
    fn non_numeric_pin_edit_is_rejected() {
        let mut peripheral = valve();
        let mut form = PeripheralForm::new();

        form.focus_pin(&peripheral);
        form.change_pin("thirteen");
        form.blur_pin(&mut peripheral);

        // Owner-side validation: the committed pin is untouched.
        assert_eq!(peripheral.pin, Some(8));
        assert_eq!(form.display_pin(&peripheral), "8");
    }

    #[test]
    fn list_reorders_rows() {
        let mut list = PeripheralList::new(vec![
            Peripheral::new("Valve", Some(8)),
            Peripheral::new("Pump", Some(9)),
            Peripheral::new("Lights", Some(10)),
        ]);

        list.move_to(2, 0);
        let labels: Vec<_> = list.peripherals().iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Lights", "Valve", "Pump"]);
    }

    #[test]
    fn list_editing_toggles() {
        let mut list = PeripheralList::default();
        assert!(!list.is_editing());
        list.toggle_editing();
        assert!(list.is_editing());

        list.push(Peripheral::new("Valve", None));
        assert_eq!(list.remove(5), None);
        assert_eq!(list.remove(0).map(|p| p.label), Some("Valve".to_owned()));
    }

    #[test]
    fn peripheral_serializes_without_id() {
        let json = serde_json::to_value(valve()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "id": null, "pin": 8, "label": "Water Valve" })
        );

        let parsed: Peripheral = serde_json::from_value(
            serde_json::json!({ "pin": 8, "label": "Water Valve" }),
        )
        .unwrap();
        assert_eq!(parsed, valve());
    }
}
