//! Multi-key commands
//!
//! Printable keys pressed in the explorer are appended to a rolling buffer of
//! the last [`CHORD_BUFFER_LEN`] characters. After every push the buffer's
//! suffix is checked against the chord table; a hit consumes the buffer.

pub const CHORD_BUFFER_LEN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chord {
    GotoTop,
    Delete { forced: bool },
    Yank,
    Paste,
    ToggleMark,
    UnmarkAll,
    DeleteMarked { forced: bool },
    YankMarked,
    PasteMarked,
    SetAnchor(char),
    JumpToAnchor(char),
}

const CHORD_TABLE: &[(&str, Chord)] = &[
    ("gg", Chord::GotoTop),
    ("dd", Chord::Delete { forced: false }),
    ("DD", Chord::Delete { forced: true }),
    ("yy", Chord::Yank),
    ("pp", Chord::Paste),
    ("mm", Chord::ToggleMark),
    ("mu", Chord::UnmarkAll),
    ("md", Chord::DeleteMarked { forced: false }),
    ("mD", Chord::DeleteMarked { forced: true }),
    ("my", Chord::YankMarked),
    ("mp", Chord::PasteMarked),
];

#[derive(Debug, Default, Clone)]
pub struct KeyChord {
    buffer: String,
}

impl KeyChord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one key. Returns the completed chord, if any.
    pub fn push(&mut self, key: char) -> Option<Chord> {
        self.buffer.push(key);
        if self.buffer.chars().count() > CHORD_BUFFER_LEN {
            self.buffer.remove(0);
        }

        let chord = self.match_suffix();
        if let Some(chord) = chord {
            log::debug!("chord: {:?} from buffer {:?}", chord, self.buffer);
            self.buffer.clear();
        }
        chord
    }

    fn match_suffix(&self) -> Option<Chord> {
        if let Some((_, chord)) = CHORD_TABLE
            .iter()
            .find(|(keys, _)| self.buffer.ends_with(keys))
        {
            return Some(*chord);
        }

        let mut tail = self.buffer.chars().rev();
        match (tail.next(), tail.next()) {
            (Some(key), Some('A')) if key.is_ascii_alphanumeric() => Some(Chord::SetAnchor(key)),
            (Some(key), Some('a')) if key.is_ascii_alphanumeric() => {
                Some(Chord::JumpToAnchor(key))
            }
            _ => None,
        }
    }

    /// True when the last key could still start a chord.
    pub fn is_pending(&self) -> bool {
        matches!(
            self.buffer.chars().last(),
            Some('g' | 'd' | 'D' | 'y' | 'p' | 'm' | 'A' | 'a')
        )
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
