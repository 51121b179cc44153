// Named rule archives: an in-memory map of tropical transducers and its
// binary serialization.

use std::collections::BTreeMap;
use std::path::Path;

use hashbrown::HashSet;
use rewrite_core::TropicalWeight;

use crate::FstError;
use crate::format::{self, HEADER_SIZE};
use crate::fst::{Transition, VectorFst};
use crate::record::{self, BodyHeader, NO_START, StateRecord, TransitionRecord};

const RECORD_SIZE: usize = 16;

/// A collection of named rule transducers over the tropical semiring.
///
/// Archives are built in memory with [`insert`](Self::insert) or loaded from
/// the binary format with [`from_bytes`](Self::from_bytes) /
/// [`open`](Self::open). Names are unique; iteration is in name order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleArchive {
    rules: BTreeMap<String, VectorFst<TropicalWeight>>,
}

impl RuleArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the rule called `name`, returning the previous one.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        fst: VectorFst<TropicalWeight>,
    ) -> Option<VectorFst<TropicalWeight>> {
        self.rules.insert(name.into(), fst)
    }

    pub fn get(&self, name: &str) -> Option<&VectorFst<TropicalWeight>> {
        self.rules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Rule names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Decode an archive from its binary form.
    pub fn from_bytes(data: &[u8]) -> Result<Self, FstError> {
        format::parse_header(data)?;
        let mut reader = Reader {
            data,
            pos: HEADER_SIZE,
        };
        let count = reader.u32()?;
        let mut rules = BTreeMap::new();
        for _ in 0..count {
            let name_len = reader.u16()? as usize;
            let name_bytes = reader.take(name_len)?;
            let name = std::str::from_utf8(name_bytes)
                .map_err(|_| FstError::InvalidEntry {
                    name: String::from_utf8_lossy(name_bytes).into_owned(),
                    reason: "name is not valid UTF-8".into(),
                })?
                .to_owned();
            let body_len = reader.u32()? as usize;
            let body = reader.take(body_len)?;
            if rules.contains_key(&name) {
                return Err(FstError::DuplicateEntry(name));
            }
            let fst = decode_body(body).map_err(|reason| FstError::InvalidEntry {
                name: name.clone(),
                reason,
            })?;
            rules.insert(name, fst);
        }
        Ok(Self { rules })
    }

    /// Read and decode an archive file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FstError> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Encode the archive, entries in name order.
    pub fn to_bytes(&self) -> Result<Vec<u8>, FstError> {
        let mut writer = ArchiveWriter::new();
        for (name, fst) in &self.rules {
            writer.add(name, fst)?;
        }
        Ok(writer.finish())
    }

    /// Encode the archive and write it to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), FstError> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }
}

impl FromIterator<(String, VectorFst<TropicalWeight>)> for RuleArchive {
    fn from_iter<I: IntoIterator<Item = (String, VectorFst<TropicalWeight>)>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Streams entries into the binary archive format.
///
/// Entries are written in the order they are added; the entry count in the
/// preamble is patched in by [`finish`](Self::finish).
#[derive(Debug)]
pub struct ArchiveWriter {
    buf: Vec<u8>,
    names: HashSet<String>,
}

impl Default for ArchiveWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveWriter {
    pub fn new() -> Self {
        let mut buf = Vec::new();
        format::write_header(&mut buf);
        buf.extend_from_slice(&0u32.to_le_bytes());
        Self {
            buf,
            names: HashSet::new(),
        }
    }

    /// Append one named transducer.
    pub fn add(&mut self, name: &str, fst: &VectorFst<TropicalWeight>) -> Result<(), FstError> {
        let invalid = |reason: &str| FstError::InvalidEntry {
            name: name.to_owned(),
            reason: reason.to_owned(),
        };
        let name_len = u16::try_from(name.len()).map_err(|_| invalid("name is too long"))?;
        if self.names.contains(name) {
            return Err(FstError::DuplicateEntry(name.to_owned()));
        }
        let body = encode_body(fst).ok_or_else(|| invalid("transducer is too large"))?;
        let body_len = u32::try_from(body.len()).map_err(|_| invalid("transducer is too large"))?;

        self.buf.extend_from_slice(&name_len.to_le_bytes());
        self.buf.extend_from_slice(name.as_bytes());
        self.buf.extend_from_slice(&body_len.to_le_bytes());
        self.buf.extend_from_slice(&body);
        self.names.insert(name.to_owned());
        Ok(())
    }

    /// Number of entries written so far.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The finished archive bytes.
    pub fn finish(mut self) -> Vec<u8> {
        let count = self.names.len() as u32;
        self.buf[HEADER_SIZE..HEADER_SIZE + 4].copy_from_slice(&count.to_le_bytes());
        self.buf
    }
}

fn encode_body(fst: &VectorFst<TropicalWeight>) -> Option<Vec<u8>> {
    let num_states = u32::try_from(fst.num_states()).ok()?;
    let num_transitions = u32::try_from(fst.num_transitions()).ok()?;
    let header = BodyHeader {
        start: fst.start().unwrap_or(NO_START),
        num_states,
        num_transitions,
        _reserved: 0,
    };

    let mut states = Vec::with_capacity(fst.num_states());
    let mut transitions = Vec::with_capacity(fst.num_transitions());
    for q in fst.states() {
        let ts = fst.transitions(q);
        states.push(StateRecord {
            first_transition: transitions.len() as u32,
            num_transitions: ts.len() as u32,
            final_weight: fst.final_weight(q).value(),
            _reserved: 0,
        });
        transitions.extend(ts.iter().map(|t| TransitionRecord {
            ilabel: t.ilabel,
            olabel: t.olabel,
            target: t.target,
            weight: t.weight.value(),
        }));
    }

    let mut body = Vec::with_capacity(RECORD_SIZE * (1 + states.len() + transitions.len()));
    record::write_records(&mut body, &[header]);
    record::write_records(&mut body, &states);
    record::write_records(&mut body, &transitions);
    Some(body)
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, len: usize) -> Result<&'a [u8], FstError> {
        let end = self.pos.checked_add(len).filter(|&end| end <= self.data.len());
        let Some(end) = end else {
            return Err(FstError::TooShort {
                expected: self.pos.saturating_add(len),
                actual: self.data.len(),
            });
        };
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn u16(&mut self) -> Result<u16, FstError> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> Result<u32, FstError> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }
}

fn decode_weight(value: f32, what: &str) -> Result<TropicalWeight, String> {
    if value.is_nan() {
        Err(format!("{what} weight is NaN"))
    } else {
        Ok(TropicalWeight::new(value))
    }
}

fn decode_body(body: &[u8]) -> Result<VectorFst<TropicalWeight>, String> {
    if body.len() < RECORD_SIZE || body.len() % RECORD_SIZE != 0 {
        return Err(format!("body length {} is not a positive multiple of 16", body.len()));
    }
    let header: BodyHeader = record::read_records(&body[..RECORD_SIZE], 1)[0];
    let num_states = header.num_states as usize;
    let num_transitions = header.num_transitions as usize;
    let expected = (1 + num_states as u64 + num_transitions as u64) * RECORD_SIZE as u64;
    if expected != body.len() as u64 {
        return Err(format!(
            "body holds {} bytes but {num_states} states and {num_transitions} transitions need {expected}",
            body.len()
        ));
    }

    let states_end = RECORD_SIZE * (1 + num_states);
    let states: Vec<StateRecord> = record::read_records(&body[RECORD_SIZE..states_end], num_states);
    let transitions: Vec<TransitionRecord> =
        record::read_records(&body[states_end..], num_transitions);

    let mut fst = VectorFst::new();
    for _ in 0..num_states {
        fst.add_state();
    }
    for (q, state) in states.iter().enumerate() {
        let first = state.first_transition as usize;
        let Some(slice) = first
            .checked_add(state.num_transitions as usize)
            .and_then(|end| transitions.get(first..end))
        else {
            return Err(format!("state {q} refers to transitions outside the body"));
        };
        let final_weight = decode_weight(state.final_weight, "final")?;
        fst.set_final(q as u32, final_weight);
        for t in slice {
            if t.target as usize >= num_states {
                return Err(format!("state {q} has a transition to missing state {}", t.target));
            }
            let weight = decode_weight(t.weight, "transition")?;
            fst.add_transition(q as u32, Transition::new(t.ilabel, t.olabel, weight, t.target));
        }
    }
    if header.start != NO_START {
        if header.start as usize >= num_states {
            return Err(format!("start state {} is out of range", header.start));
        }
        fst.set_start(header.start);
    }
    Ok(fst)
}
