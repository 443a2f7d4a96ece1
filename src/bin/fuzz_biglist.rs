//! AFL fuzz harness for BigList
//!
//! Differential test against `Vec`: every operation is applied to both, and
//! after each one the list must match the vector and pass the full structural
//! check. The small configuration (fan-out 4, leaf size 4) makes shallow
//! inputs reach deep trees.

use afl::fuzz;
use biglist::{BigList, BigListConfig};

/// Operation types the fuzzer can generate
#[derive(Debug, Clone, Copy)]
enum FuzzOp {
    Insert { pos_frac: u8, value: u8 },
    InsertRange { pos_frac: u8, len: u8 },
    RemoveAt { pos_frac: u8 },
    RemoveRange { pos_frac: u8, len: u8 },
    Reverse,
    ReverseRange { pos_frac: u8, len: u8 },
    CopyWithin { src_frac: u8, dst_frac: u8, len: u8 },
    Resize { len: u8, at_front: bool },
    SetCapacity { extra: u8 },
}

impl FuzzOp {
    fn from_bytes(bytes: &[u8]) -> Option<(FuzzOp, &[u8])> {
        let (&tag, rest) = bytes.split_first()?;
        let op = match tag % 9 {
            0 if rest.len() >= 2 => FuzzOp::Insert {
                pos_frac: rest[0],
                value: rest[1],
            },
            1 if rest.len() >= 2 => FuzzOp::InsertRange {
                pos_frac: rest[0],
                len: rest[1] % 64,
            },
            2 if !rest.is_empty() => FuzzOp::RemoveAt { pos_frac: rest[0] },
            3 if rest.len() >= 2 => FuzzOp::RemoveRange {
                pos_frac: rest[0],
                len: rest[1] % 64,
            },
            4 => return Some((FuzzOp::Reverse, rest)),
            5 if rest.len() >= 2 => FuzzOp::ReverseRange {
                pos_frac: rest[0],
                len: rest[1],
            },
            6 if rest.len() >= 3 => FuzzOp::CopyWithin {
                src_frac: rest[0],
                dst_frac: rest[1],
                len: rest[2],
            },
            7 if rest.len() >= 2 => FuzzOp::Resize {
                len: rest[0],
                at_front: rest[1] % 2 == 0,
            },
            8 if !rest.is_empty() => FuzzOp::SetCapacity { extra: rest[0] },
            _ => return None,
        };
        let used = match op {
            FuzzOp::RemoveAt { .. } | FuzzOp::SetCapacity { .. } => 1,
            FuzzOp::CopyWithin { .. } => 3,
            _ => 2,
        };
        return Some((op, &rest[used..]));
    }
}

/// Scale a byte onto `0..=len`.
fn scaled(frac: u8, len: usize) -> usize {
    return (frac as usize * len / 255).min(len);
}

fn main() {
    let config = BigListConfig::new(2, 2).expect("valid config");

    fuzz!(|data: &[u8]| {
        let mut list: BigList<u16> = BigList::with_config(config);
        let mut oracle: Vec<u16> = Vec::new();
        let mut next: u16 = 0;
        let mut remaining = data;

        while let Some((op, rest)) = FuzzOp::from_bytes(remaining) {
            remaining = rest;
            let len = oracle.len();

            match op {
                FuzzOp::Insert { pos_frac, value } => {
                    let pos = scaled(pos_frac, len);
                    list.insert(pos, value as u16).unwrap();
                    oracle.insert(pos, value as u16);
                }
                FuzzOp::InsertRange { pos_frac, len: count } => {
                    let pos = scaled(pos_frac, len);
                    let items: Vec<u16> = (0..count as u16).map(|i| next.wrapping_add(i)).collect();
                    next = next.wrapping_add(count as u16);
                    list.insert_iter(pos, items.iter().copied()).unwrap();
                    oracle.splice(pos..pos, items);
                }
                FuzzOp::RemoveAt { pos_frac } => {
                    if len > 0 {
                        let pos = scaled(pos_frac, len - 1);
                        assert_eq!(list.remove_at(pos).unwrap(), oracle.remove(pos));
                    }
                }
                FuzzOp::RemoveRange { pos_frac, len: count } => {
                    let pos = scaled(pos_frac, len);
                    let count = (count as usize).min(len - pos);
                    list.remove_range(pos, count).unwrap();
                    oracle.drain(pos..pos + count);
                }
                FuzzOp::Reverse => {
                    list.reverse();
                    oracle.reverse();
                }
                FuzzOp::ReverseRange { pos_frac, len: count } => {
                    let pos = scaled(pos_frac, len);
                    let count = scaled(count, len - pos);
                    list.reverse_range(pos, count).unwrap();
                    oracle[pos..pos + count].reverse();
                }
                FuzzOp::CopyWithin { src_frac, dst_frac, len: count } => {
                    let src = scaled(src_frac, len);
                    let count = scaled(count, len - src);
                    let dst = scaled(dst_frac, len);
                    list.copy_within(src, dst, count).unwrap();
                    let copied = oracle[src..src + count].to_vec();
                    oracle.resize(oracle.len().max(dst + count), 0);
                    oracle[dst..dst + count].copy_from_slice(&copied);
                }
                FuzzOp::Resize { len: target, at_front } => {
                    let target = target as usize;
                    if at_front {
                        list.resize_left(target, 7).unwrap();
                        if target < len {
                            oracle.drain(..len - target);
                        } else {
                            oracle.splice(0..0, std::iter::repeat_n(7, target - len));
                        }
                    } else {
                        list.resize(target, 7).unwrap();
                        oracle.resize(target, 7);
                    }
                }
                FuzzOp::SetCapacity { extra } => {
                    list.set_capacity(len + extra as usize).unwrap();
                }
            }

            list.verify().unwrap();
            assert!(list == oracle, "list diverged from oracle after {op:?}");
        }
    });
}
