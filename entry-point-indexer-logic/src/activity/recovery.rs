use alloy::{
    primitives::{Address, Bytes, U256},
    sol_types::SolValue,
};

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Slice of the bundle `input` that encodes one user operation.
///
/// The slice starts at the encoded `(sender, nonce)` head of the operation and ends
/// after the bytes of its signature. Both markers are assumed to occur once, in that
/// order. Returns empty bytes when either marker is missing.
pub fn recover_original_calldata(
    input: &[u8],
    sender: Address,
    nonce: U256,
    signature: &[u8],
) -> Bytes {
    let head = (sender, nonce).abi_encode();
    let Some(start) = find(input, &head) else {
        return Bytes::new();
    };
    let Some(offset) = find(&input[start..], signature) else {
        return Bytes::new();
    };
    let end = start + offset + signature.len();
    Bytes::copy_from_slice(&input[start..end])
}
