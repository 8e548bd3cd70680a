//! Input collection
//!
//! `FormState` mirrors the editable controls of the client: raw frame-count
//! text, the reference string as typed, and the algorithm selector toggles.
//! `collect` turns it into a [`SimulationRequest`] or a validation error
//! without touching anything else.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use crate::error::InputError;
use crate::model::{AlgorithmId, RandomInput, SimulationRequest, DEFAULT_FRAMES};

/// One algorithm selector and its toggle state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmOption {
    pub id: AlgorithmId,
    pub selected: bool,
}

/// Ordered set of algorithm selectors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmToggles {
    options: Vec<AlgorithmOption>,
}

impl Default for AlgorithmToggles {
    fn default() -> Self {
        Self::new(AlgorithmId::builtin())
    }
}

impl AlgorithmToggles {
    /// Selectors for `ids`, all initially unselected
    pub fn new(ids: Vec<AlgorithmId>) -> Self {
        let mut options: Vec<AlgorithmOption> = Vec::with_capacity(ids.len());
        for id in ids {
            if !options.iter().any(|option| option.id == id) {
                options.push(AlgorithmOption { id, selected: false });
            }
        }
        Self { options }
    }

    /// Flip the selector for `id`. Returns the new state, or `None` when no
    /// such selector exists.
    pub fn toggle(&mut self, id: &AlgorithmId) -> Option<bool> {
        let option = self.options.iter_mut().find(|option| &option.id == id)?;
        option.selected = !option.selected;
        Some(option.selected)
    }

    pub fn set_selected(&mut self, id: &AlgorithmId, selected: bool) -> bool {
        match self.options.iter_mut().find(|option| &option.id == id) {
            Some(option) => {
                option.selected = selected;
                true
            }
            None => false,
        }
    }

    pub fn is_selected(&self, id: &AlgorithmId) -> bool {
        self.options.iter().any(|option| &option.id == id && option.selected)
    }

    /// Selected identifiers in selector order
    pub fn selected(&self) -> Vec<AlgorithmId> {
        self.options
            .iter()
            .filter(|option| option.selected)
            .map(|option| option.id.clone())
            .collect()
    }

    pub fn options(&self) -> &[AlgorithmOption] {
        &self.options
    }
}

/// Built-in sample input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplePreset {
    pub label: &'static str,
    pub reference_string: &'static str,
    pub frames: u32,
}

/// Samples offered next to the form
pub const SAMPLE_PRESETS: &[SamplePreset] = &[
    SamplePreset {
        label: "Textbook",
        reference_string: "7 0 1 2 0 3 0 4 2 3 0 3 2",
        frames: 3,
    },
    SamplePreset {
        label: "Belady's anomaly",
        reference_string: "1 2 3 4 1 2 5 1 2 3 4 5",
        frames: 3,
    },
    SamplePreset {
        label: "Locality",
        reference_string: "1 2 1 3 1 2 1 4 1 2 1 3",
        frames: 2,
    },
];

/// Current contents of the input form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    /// Frame count as typed
    pub frames: String,

    /// Reference string as typed
    pub reference_string: String,

    pub algorithms: AlgorithmToggles,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            frames: DEFAULT_FRAMES.to_string(),
            reference_string: String::new(),
            algorithms: AlgorithmToggles::default(),
        }
    }
}

impl FormState {
    pub fn apply_preset(&mut self, preset: &SamplePreset) {
        self.reference_string = preset.reference_string.to_string();
        self.frames = preset.frames.to_string();
    }

    pub fn apply_random(&mut self, input: &RandomInput) {
        self.reference_string = input.reference_string.clone();
        self.frames = input.frames.to_string();
    }

    /// Frame count the form currently stands for
    pub fn frame_count(&self) -> u32 {
        parse_frames(&self.frames)
    }
}

/// Parse a frame count, falling back to [`DEFAULT_FRAMES`] for anything
/// that is not a positive integer.
pub fn parse_frames(text: &str) -> u32 {
    match text.trim().parse::<u32>() {
        Ok(frames) if frames >= 1 => frames,
        _ => DEFAULT_FRAMES,
    }
}

/// Read the form into a request.
///
/// The algorithm selection is checked before the reference string; the
/// reference string itself is passed through as typed.
pub fn collect(form: &FormState) -> Result<SimulationRequest, InputError> {
    let algorithms = form.algorithms.selected();
    if algorithms.is_empty() {
        return Err(InputError::NoAlgorithmSelected);
    }
    SimulationRequest::new(form.frame_count(), form.reference_string.clone(), algorithms)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_with(reference: &str, frames: &str, selected: &[&str]) -> FormState {
        let mut form = FormState {
            frames: frames.to_string(),
            reference_string: reference.to_string(),
            ..FormState::default()
        };
        for id in selected {
            form.algorithms.toggle(&AlgorithmId::new(*id));
        }
        form
    }

    #[test]
    fn test_parse_frames_fallback() {
        assert_eq!(parse_frames("4"), 4);
        assert_eq!(parse_frames(" 5 "), 5);
        assert_eq!(parse_frames(""), 3);
        assert_eq!(parse_frames("three"), 3);
        assert_eq!(parse_frames("0"), 3);
        assert_eq!(parse_frames("-2"), 3);
    }

    #[test]
    fn test_collect_requires_algorithm() {
        let form = form_with("1 2 3", "3", &[]);
        assert_eq!(collect(&form).unwrap_err(), InputError::NoAlgorithmSelected);
    }

    #[test]
    fn test_collect_checks_algorithms_first() {
        let form = form_with("   ", "3", &[]);
        assert_eq!(collect(&form).unwrap_err(), InputError::NoAlgorithmSelected);
    }

    #[test]
    fn test_collect_rejects_blank_reference() {
        for blank in ["", "   ", "\n\t"] {
            let form = form_with(blank, "3", &["fifo"]);
            assert_eq!(collect(&form).unwrap_err(), InputError::EmptyReferenceString);
        }
    }

    #[test]
    fn test_collect_passes_reference_through() {
        let form = form_with("7,0,1,2,0,3,0,4", "x", &["lru", "fifo"]);
        let request = collect(&form).unwrap();
        assert_eq!(request.reference_string(), "7,0,1,2,0,3,0,4");
        assert_eq!(request.frames(), 3);
        let ids: Vec<&str> = request.algorithms().iter().map(AlgorithmId::as_str).collect();
        assert_eq!(ids, vec!["fifo", "lru"]);
    }

    #[test]
    fn test_toggle_twice_deselects() {
        let mut toggles = AlgorithmToggles::default();
        let lru = AlgorithmId::new("lru");
        assert_eq!(toggles.toggle(&lru), Some(true));
        assert!(toggles.is_selected(&lru));
        assert_eq!(toggles.toggle(&lru), Some(false));
        assert!(toggles.selected().is_empty());
        assert_eq!(toggles.toggle(&AlgorithmId::new("clock")), None);
    }

    #[test]
    fn test_duplicate_options_collapse() {
        let toggles = AlgorithmToggles::new(vec![AlgorithmId::new("fifo"), AlgorithmId::new("FIFO")]);
        assert_eq!(toggles.options().len(), 1);
    }

    #[test]
    fn test_apply_preset_and_random() {
        let mut form = FormState::default();
        form.apply_preset(&SAMPLE_PRESETS[1]);
        assert_eq!(form.reference_string, "1 2 3 4 1 2 5 1 2 3 4 5");
        assert_eq!(form.frame_count(), 3);

        form.apply_random(&RandomInput {
            reference_string: "4 4 2".into(),
            frames: 5,
        });
        assert_eq!(form.reference_string, "4 4 2");
        assert_eq!(form.frames, "5");
    }
}
