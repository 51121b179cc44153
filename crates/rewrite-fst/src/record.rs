// Fixed-size state and transition records of the rule archive body, read
// and written through bytemuck.

use bytemuck::{Pod, Zeroable};

/// Start-state value marking a transducer with no start state.
pub const NO_START: u32 = u32::MAX;

/// Body header (16 bytes), at the start of every entry body.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct BodyHeader {
    pub start: u32,
    pub num_states: u32,
    pub num_transitions: u32,
    pub _reserved: u32,
}

/// One state (16 bytes).
///
/// - `first_transition`: index of the state's first transition record
/// - `num_transitions`: number of consecutive records belonging to it
/// - `final_weight`: tropical final weight (`+inf` = not final)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct StateRecord {
    pub first_transition: u32,
    pub num_transitions: u32,
    pub final_weight: f32,
    pub _reserved: u32,
}

/// One transition (16 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct TransitionRecord {
    pub ilabel: u32,
    pub olabel: u32,
    pub target: u32,
    pub weight: f32,
}

/// Records are stored little-endian. `swap_le` converts every field between
/// host order and little-endian; it is its own inverse and a no-op on
/// little-endian hosts.
pub(crate) trait LittleEndian: Pod {
    fn swap_le(self) -> Self;
}

#[inline]
fn f32_le(value: f32) -> f32 {
    f32::from_bits(value.to_bits().to_le())
}

impl LittleEndian for BodyHeader {
    fn swap_le(self) -> Self {
        Self {
            start: self.start.to_le(),
            num_states: self.num_states.to_le(),
            num_transitions: self.num_transitions.to_le(),
            _reserved: self._reserved.to_le(),
        }
    }
}

impl LittleEndian for StateRecord {
    fn swap_le(self) -> Self {
        Self {
            first_transition: self.first_transition.to_le(),
            num_transitions: self.num_transitions.to_le(),
            final_weight: f32_le(self.final_weight),
            _reserved: self._reserved.to_le(),
        }
    }
}

impl LittleEndian for TransitionRecord {
    fn swap_le(self) -> Self {
        Self {
            ilabel: self.ilabel.to_le(),
            olabel: self.olabel.to_le(),
            target: self.target.to_le(),
            weight: f32_le(self.weight),
        }
    }
}

/// Copy `count` little-endian records of type `T` out of `bytes` into an
/// aligned vector in host order. `bytes` must hold exactly
/// `count * size_of::<T>()` bytes.
pub(crate) fn read_records<T: LittleEndian>(bytes: &[u8], count: usize) -> Vec<T> {
    let mut records = vec![T::zeroed(); count];
    bytemuck::cast_slice_mut::<T, u8>(&mut records).copy_from_slice(bytes);
    records.into_iter().map(T::swap_le).collect()
}

/// Append `records` to `out` in little-endian order.
pub(crate) fn write_records<T: LittleEndian>(out: &mut Vec<u8>, records: &[T]) {
    for record in records {
        out.extend_from_slice(bytemuck::bytes_of(&record.swap_le()));
    }
}

const _: () = assert!(size_of::<BodyHeader>() == 16);
const _: () = assert!(size_of::<StateRecord>() == 16);
const _: () = assert!(size_of::<TransitionRecord>() == 16);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_sizes() {
        assert_eq!(size_of::<BodyHeader>(), 16);
        assert_eq!(size_of::<StateRecord>(), 16);
        assert_eq!(size_of::<TransitionRecord>(), 16);
    }

    #[test]
    fn written_records_are_little_endian_on_any_host() {
        let t = TransitionRecord {
            ilabel: 0x0102_0304,
            olabel: 5,
            target: 6,
            weight: 1.5,
        };
        let mut bytes = Vec::new();
        write_records(&mut bytes, &[t]);
        assert_eq!(&bytes[..4], &[4, 3, 2, 1]);
        assert_eq!(&bytes[4..8], &5u32.to_le_bytes());
        assert_eq!(&bytes[12..16], &1.5f32.to_le_bytes());
        assert_eq!(read_records::<TransitionRecord>(&bytes, 1), vec![t]);
    }

    #[test]
    fn state_record_reads_little_endian_bytes() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&7u32.to_le_bytes());
        bytes.extend_from_slice(&2u32.to_le_bytes());
        bytes.extend_from_slice(&0.5f32.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        let state: StateRecord = read_records(&bytes, 1)[0];
        assert_eq!(state.first_transition, 7);
        assert_eq!(state.num_transitions, 2);
        assert_eq!(state.final_weight, 0.5);
    }

    #[test]
    fn read_records_from_unaligned_bytes() {
        let states = [
            StateRecord {
                first_transition: 0,
                num_transitions: 2,
                final_weight: f32::INFINITY,
                _reserved: 0,
            },
            StateRecord {
                first_transition: 2,
                num_transitions: 0,
                final_weight: 0.25,
                _reserved: 0,
            },
        ];
        let mut buf = vec![0xAAu8];
        write_records(&mut buf, &states);
        let read: Vec<StateRecord> = read_records(&buf[1..], 2);
        assert_eq!(read, states);
    }
}
