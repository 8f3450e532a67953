use serde_json::json;

use crate::asr::{RecognitionResult, RecognizedWord};

/// Words grouped by diarization speaker tag.
///
/// An explicit ordered map: groups keep the order in which their speaker
/// tags were first encountered, and both iteration orders are exposed
/// because the upload path renders sorted by tag while streaming-style
/// consumers want encounter order. Diarization caps out at 8 speakers,
/// so the backing Vec with a linear probe beats a real map here.
#[derive(Debug, Clone, Default)]
pub struct SpeakerGroups {
    groups: Vec<(u32, Vec<RecognizedWord>)>,
}

impl SpeakerGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a word to its speaker's group, creating the group on
    /// first encounter. Words are never reordered within a group.
    pub fn push(&mut self, word: RecognizedWord) {
        let tag = word.speaker_tag;
        match self.groups.iter_mut().find(|(t, _)| *t == tag) {
            Some((_, words)) => words.push(word),
            None => self.groups.push((tag, vec![word])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Groups in the order their speaker tags were first encountered.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[RecognizedWord])> {
        self.groups.iter().map(|(tag, words)| (*tag, words.as_slice()))
    }

    /// Groups in ascending speaker-tag order.
    pub fn iter_sorted(&self) -> impl Iterator<Item = (u32, &[RecognizedWord])> {
        let mut ordered: Vec<_> = self.groups.iter().collect();
        ordered.sort_by_key(|(tag, _)| *tag);
        ordered
            .into_iter()
            .map(|(tag, words)| (*tag, words.as_slice()))
    }
}

/// Groups every word of every segment's top alternative by speaker tag,
/// in original recognition order. Lower-ranked alternatives are ignored.
/// An empty result yields empty groups, not an error.
pub fn aggregate(result: &RecognitionResult) -> SpeakerGroups {
    let mut groups = SpeakerGroups::new();
    for segment in &result.segments {
        let Some(alternative) = segment.alternatives.first() else {
            continue;
        };
        for word in &alternative.words {
            groups.push(word.clone());
        }
    }
    groups
}

/// Renders groups sorted by ascending speaker tag. Upload-path policy:
/// `Speaker 1` always precedes `Speaker 2` no matter who spoke first.
pub fn render_sorted(groups: &SpeakerGroups) -> String {
    render(groups.iter_sorted())
}

/// Renders groups in the order their speakers were first heard.
pub fn render_in_order(groups: &SpeakerGroups) -> String {
    render(groups.iter())
}

fn render<'a>(groups: impl Iterator<Item = (u32, &'a [RecognizedWord])>) -> String {
    groups
        .map(|(tag, words)| {
            let joined = words
                .iter()
                .map(|w| w.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            format!("Speaker {tag}: {joined}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Per-speaker timed word breakdown: speaker tag mapped to a list of
/// `{word, start_time, end_time}` with times in seconds (null when the
/// recognizer omitted timing). Written as a side artifact by the upload
/// endpoint for downstream consumers.
pub fn timed_words(groups: &SpeakerGroups) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    for (tag, words) in groups.iter() {
        let entries: Vec<_> = words
            .iter()
            .map(|w| {
                json!({
                    "word": w.text,
                    "start_time": w.start_time.map(|d| d.as_secs_f64()),
                    "end_time": w.end_time.map(|d| d.as_secs_f64()),
                })
            })
            .collect();
        map.insert(tag.to_string(), json!(entries));
    }
    serde_json::Value::Object(map)
}
