/// One position of a digest: which slot of a key it selects, and whether
/// the `secret0` or `secret1` half of that slot is revealed.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct BitIndex {
    pub slot: usize,
    pub value: u8,
}

impl BitIndex {
    /// Index into a `[_; 2]` slot pair.
    pub fn half(&self) -> usize {
        self.value as usize
    }
}

/// Walks the bits of `digest` in slot order, most significant bit of each
/// byte first. Signing and verification must both walk digests through
/// this function so that they agree on the order.
pub fn bit_indices(digest: &[u8]) -> impl Iterator<Item = BitIndex> + '_ {
    (0..digest.len() * 8).map(move |slot| BitIndex {
        slot,
        value: bit_of_byteslice(slot, digest),
    })
}

fn bit_of_byteslice(index: usize, bytes: &[u8]) -> u8 {
    let byte = bytes[index.div_euclid(8)];
    bit_of_byte(index.rem_euclid(8), byte)
}

fn bit_of_byte(offset: usize, byte: u8) -> u8 {
    (byte >> (7 - offset)) & 1
}

#[test]
fn test_bit_of_byteslice() {
    assert_eq!(bit_of_byteslice(0, b"\x00\x00"), 0);
    assert_eq!(bit_of_byteslice(0, b"\x80\x00"), 1);
    assert_eq!(bit_of_byteslice(7, b"\x80\x00"), 0);
    assert_eq!(bit_of_byteslice(9, b"\xFF\x00"), 0);
    assert_eq!(bit_of_byteslice(9, b"\xFF\x40"), 1);
    assert_eq!(bit_of_byteslice(15, b"\x00\x01"), 1);
}

#[test]
fn test_bit_of_byte() {
    assert_eq!(bit_of_byte(0, 0b1000_0000), 1);
    assert_eq!(bit_of_byte(0, 0b0111_1111), 0);
    assert_eq!(bit_of_byte(7, 0b0000_0001), 1);
}

#[test]
fn test_bit_indices_order() {
    let bits: Vec<BitIndex> = bit_indices(&[0b1010_0000, 0x01]).collect();
    assert_eq!(bits.len(), 16);
    assert!(bits.iter().enumerate().all(|(i, b)| b.slot == i));
    let values: Vec<u8> = bits.iter().map(|b| b.value).collect();
    assert_eq!(values, [1, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1]);
}
