/// Streaming decoder for `application/x-www-form-urlencoded` bodies.
///
/// Decodes one `key=value` record per call, writing the decoded bytes into
/// caller-provided buffers. The buffers bound the decoded sizes: bytes past
/// their capacity are dropped while input consumption continues, so an
/// oversized value truncates instead of spilling.
pub struct PairDecoder<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> PairDecoder<'a> {
    pub fn new(body: &'a [u8]) -> Self {
        Self { input: body, pos: 0 }
    }

    /// Decode the next pair, consuming input up to and including the next
    /// `&` or the end of the body. Keys are folded to ASCII lowercase;
    /// values keep their case. Returns the decoded key and value lengths,
    /// or `None` once the body is exhausted.
    pub fn next_pair(&mut self, key: &mut [u8], value: &mut [u8]) -> Option<(usize, usize)> {
        if self.pos >= self.input.len() {
            return None;
        }
        let mut key_len = 0;
        let mut value_len = 0;
        let mut in_key = true;
        while self.pos < self.input.len() {
            let byte = self.input[self.pos];
            self.pos += 1;
            let decoded = match byte {
                b'&' => break,
                b'=' if in_key => {
                    in_key = false;
                    continue;
                }
                b'%' => match self.take_hex_pair() {
                    Some(b) => b,
                    // Escape cut off by the end of the body; nothing to emit.
                    None => continue,
                },
                b'+' => b' ',
                other => other,
            };
            if in_key {
                put(key, &mut key_len, decoded.to_ascii_lowercase());
            } else {
                put(value, &mut value_len, decoded);
            }
        }
        Some((key_len, value_len))
    }

    /// Consume the two hex digits of a `%HH` escape and return the decoded
    /// byte. Both digits are consumed before anything is emitted, so the
    /// byte following an escape is never swallowed. A non-hex digit is
    /// substituted with `'4'` to keep malformed escapes from decoding to
    /// arbitrary control bytes.
    fn take_hex_pair(&mut self) -> Option<u8> {
        let hi = self.take_hex_digit()?;
        let lo = self.take_hex_digit()?;
        Some(hi * 0x10 + lo)
    }

    fn take_hex_digit(&mut self) -> Option<u8> {
        if self.pos >= self.input.len() {
            return None;
        }
        let ch = self.input[self.pos].to_ascii_lowercase();
        self.pos += 1;
        match ch {
            b'0'..=b'9' => Some(ch - b'0'),
            b'a'..=b'f' => Some(ch - b'a' + 0xa),
            _ => Some(b'4' - b'0'),
        }
    }
}

#[inline]
fn put(buf: &mut [u8], len: &mut usize, byte: u8) {
    if *len < buf.len() {
        buf[*len] = byte;
        *len += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(body: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)> {
        let mut decoder = PairDecoder::new(body);
        let mut key = [0u8; 32];
        let mut value = [0u8; 64];
        let mut pairs = Vec::new();
        while let Some((k, v)) = decoder.next_pair(&mut key, &mut value) {
            pairs.push((key[..k].to_vec(), value[..v].to_vec()));
        }
        pairs
    }

    #[test]
    fn single_pair() {
        assert_eq!(decode_all(b"value=512"), vec![(b"value".to_vec(), b"512".to_vec())]);
    }

    #[test]
    fn byte_after_escape_is_preserved() {
        assert_eq!(
            decode_all(b"value=a%20bc"),
            vec![(b"value".to_vec(), b"a bc".to_vec())]
        );
    }

    #[test]
    fn bad_hex_digits_are_substituted() {
        // 'z' and 'g' each become '4', so %zg decodes as 0x44.
        assert_eq!(decode_all(b"k=%zg"), vec![(b"k".to_vec(), b"D".to_vec())]);
    }

    #[test]
    fn plus_decodes_to_space() {
        assert_eq!(
            decode_all(b"city=New+York"),
            vec![(b"city".to_vec(), b"New York".to_vec())]
        );
    }

    #[test]
    fn keys_fold_values_keep_case() {
        assert_eq!(
            decode_all(b"VaLuE=MiXeD"),
            vec![(b"value".to_vec(), b"MiXeD".to_vec())]
        );
    }

    #[test]
    fn second_equals_is_a_value_byte() {
        assert_eq!(decode_all(b"a=b=c"), vec![(b"a".to_vec(), b"b=c".to_vec())]);
    }

    #[test]
    fn multiple_pairs_and_empty_records() {
        assert_eq!(
            decode_all(b"a=1&&value=two"),
            vec![
                (b"a".to_vec(), b"1".to_vec()),
                (Vec::new(), Vec::new()),
                (b"value".to_vec(), b"two".to_vec()),
            ]
        );
    }

    #[test]
    fn truncated_escape_at_end_of_body() {
        assert_eq!(decode_all(b"k=ab%2"), vec![(b"k".to_vec(), b"ab".to_vec())]);
    }

    #[test]
    fn oversized_value_truncates_but_consumes() {
        let mut decoder = PairDecoder::new(b"value=abcdef&next=1");
        let mut key = [0u8; 8];
        let mut value = [0u8; 3];
        let (k, v) = decoder.next_pair(&mut key, &mut value).unwrap();
        assert_eq!(&key[..k], b"value");
        assert_eq!(&value[..v], b"abc");
        let (k, _) = decoder.next_pair(&mut key, &mut value).unwrap();
        assert_eq!(&key[..k], b"next");
    }
}
