/*
* Every io_uring submission carries a 64-bit user_data tag that comes back
* with its completion. We pack two things into it:
*
* 1. Which connection the event is for - an index into the connection pool.
*
* 2. Which operation completed - Accept, Recv or Send.
*/

const OP_BITS: u64 = 8;
const OP_MASK: u64 = (1 << OP_BITS) - 1;

#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Op {
    Accept = 1,
    Recv = 2,
    Send = 3,
}

impl Op {
    #[inline]
    pub fn try_from_u8(v: u8) -> Option<Self> {
        Some(match v {
            1 => Op::Accept,
            2 => Op::Recv,
            3 => Op::Send,
            _ => return None,
        })
    }
}

#[inline]
pub fn pack_user_data(conn_id: usize, op: Op) -> u64 {
    let id = conn_id as u64;
    debug_assert!(id >> (64 - OP_BITS) == 0, "connection id exceeds 56 bits");
    (id << OP_BITS) | (op as u64)
}

#[inline]
pub fn unpack_user_data(tag: u64) -> (usize, Option<Op>) {
    ((tag >> OP_BITS) as usize, Op::try_from_u8((tag & OP_MASK) as u8))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_unpack_roundtrip() {
        for op in [Op::Accept, Op::Recv, Op::Send] {
            let (id, unpacked) = unpack_user_data(pack_user_data(0xABCDE, op));
            assert_eq!(id, 0xABCDE);
            assert_eq!(unpacked, Some(op));
        }
    }

    #[test]
    fn unknown_opcode_is_none() {
        let (_, op) = unpack_user_data(0x42);
        assert_eq!(op, None);
    }
}
