//! Low-level record encoding: LEB128 varints, zigzag deltas and point runs.

use bytes::{BufMut, BytesMut};

use crate::geometry::QuantizedPoint;

use super::types::FeatureError;

/// Header bits 0-1: geometry kind tag.
pub(crate) const KIND_MASK: u8 = 0b0000_0011;
/// Header bit 2: a layer byte follows the type codes.
pub(crate) const HAS_LAYER: u8 = 0b0000_0100;
/// Header bit 3: a name follows.
pub(crate) const HAS_NAME: u8 = 0b0000_1000;
/// Header bit 4: the limit rectangle follows.
pub(crate) const HAS_RECT: u8 = 0b0001_0000;
/// Bits that may be set in a valid header.
pub(crate) const HEADER_MASK: u8 = KIND_MASK | HAS_LAYER | HAS_NAME | HAS_RECT;

/// Append an unsigned LEB128 varint.
pub(crate) fn put_varint(buf: &mut BytesMut, mut value: u64) {
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        buf.put_u8(byte);
        if value == 0 {
            break;
        }
    }
}

/// Append a signed value as a zigzag varint.
pub(crate) fn put_svarint(buf: &mut BytesMut, value: i64) {
    put_varint(buf, ((value << 1) ^ (value >> 63)) as u64);
}

/// Append a run of points.
///
/// With `origin == None` the first point is written absolute and the rest as
/// deltas; otherwise every point is a delta, the first one from `origin`.
pub(crate) fn put_points(buf: &mut BytesMut, points: &[QuantizedPoint], origin: Option<QuantizedPoint>) {
    let mut prev = origin;
    for &p in points {
        match prev {
            None => {
                put_varint(buf, u64::from(p.x));
                put_varint(buf, u64::from(p.y));
            }
            Some(q) => {
                put_svarint(buf, i64::from(p.x) - i64::from(q.x));
                put_svarint(buf, i64::from(p.y) - i64::from(q.y));
            }
        }
        prev = Some(p);
    }
}

/// Bounds-checked cursor over a record.
#[derive(Debug, Clone)]
pub(crate) struct WireReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    pub(crate) fn new(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8, FeatureError> {
        let byte = *self
            .data
            .get(self.pos)
            .ok_or(FeatureError::UnexpectedEof { offset: self.pos })?;
        self.pos += 1;
        Ok(byte)
    }

    pub(crate) fn read_i8(&mut self) -> Result<i8, FeatureError> {
        self.read_u8().map(|b| b as i8)
    }

    pub(crate) fn read_varint(&mut self) -> Result<u64, FeatureError> {
        let start = self.pos;
        let mut result: u64 = 0;
        let mut shift = 0;
        loop {
            let byte = self.read_u8()?;
            if shift == 63 && byte > 1 {
                return Err(FeatureError::VarintOverflow { offset: start });
            }
            result |= u64::from(byte & 0x7F) << shift;
            if byte & 0x80 == 0 {
                return Ok(result);
            }
            shift += 7;
            if shift > 63 {
                return Err(FeatureError::VarintOverflow { offset: start });
            }
        }
    }

    pub(crate) fn read_svarint(&mut self) -> Result<i64, FeatureError> {
        let encoded = self.read_varint()?;
        Ok(((encoded >> 1) as i64) ^ -((encoded & 1) as i64))
    }

    pub(crate) fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], FeatureError> {
        if len > self.remaining() {
            return Err(FeatureError::UnexpectedEof {
                offset: self.data.len(),
            });
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    /// A varint element count, bounded by the bytes left in the record.
    ///
    /// Every counted element takes at least one byte, so larger counts can
    /// only come from a truncated or corrupt record.
    pub(crate) fn read_count(&mut self) -> Result<usize, FeatureError> {
        let count = self.read_varint()?;
        usize::try_from(count)
            .ok()
            .filter(|&c| c <= self.remaining())
            .ok_or(FeatureError::UnexpectedEof {
                offset: self.data.len(),
            })
    }

    /// Validate a run of `count` points and move past it.
    ///
    /// Returns the offset of the first point.
    pub(crate) fn skip_points(
        &mut self,
        count: usize,
        origin: Option<QuantizedPoint>,
        max: u32,
    ) -> Result<usize, FeatureError> {
        let offset = self.pos;
        let mut cursor = PointCursor::new(self.data, offset, count, origin, max);
        cursor.skip_all()?;
        self.pos = cursor.position();
        Ok(offset)
    }

    /// A grid coordinate stored as an absolute varint.
    pub(crate) fn read_coord(&mut self, max: u32) -> Result<u32, FeatureError> {
        let offset = self.pos;
        let value = self.read_varint()?;
        u32::try_from(value)
            .ok()
            .filter(|&v| v <= max)
            .ok_or(FeatureError::CoordinateOutOfRange { offset })
    }
}

/// Decodes a run written by [`put_points`].
///
/// Every coordinate is checked against the grid, so a run accepted once by
/// [`CompiledFeature::from_bytes`](super::CompiledFeature::from_bytes) decodes
/// without error on every later visit.
#[derive(Debug, Clone)]
pub(crate) struct PointCursor<'a> {
    reader: WireReader<'a>,
    remaining: usize,
    prev: Option<QuantizedPoint>,
    max: u32,
}

impl<'a> PointCursor<'a> {
    pub(crate) fn new(
        data: &'a [u8],
        offset: usize,
        count: usize,
        origin: Option<QuantizedPoint>,
        max: u32,
    ) -> Self {
        Self {
            reader: WireReader::new(data, offset),
            remaining: count,
            prev: origin,
            max,
        }
    }

    /// Byte offset just past the last decoded point.
    pub(crate) fn position(&self) -> usize {
        self.reader.position()
    }

    pub(crate) fn next_point(&mut self) -> Result<Option<QuantizedPoint>, FeatureError> {
        if self.remaining == 0 {
            return Ok(None);
        }
        let p = match self.prev {
            None => QuantizedPoint::new(
                self.reader.read_coord(self.max)?,
                self.reader.read_coord(self.max)?,
            ),
            Some(q) => QuantizedPoint::new(self.read_delta(q.x)?, self.read_delta(q.y)?),
        };
        self.prev = Some(p);
        self.remaining -= 1;
        Ok(Some(p))
    }

    /// Decode the whole run, failing on the first bad point.
    pub(crate) fn skip_all(&mut self) -> Result<(), FeatureError> {
        while self.next_point()?.is_some() {}
        Ok(())
    }

    fn read_delta(&mut self, base: u32) -> Result<u32, FeatureError> {
        let offset = self.reader.position();
        let delta = self.reader.read_svarint()?;
        i64::from(base)
            .checked_add(delta)
            .and_then(|v| u32::try_from(v).ok())
            .filter(|&v| v <= self.max)
            .ok_or(FeatureError::CoordinateOutOfRange { offset })
    }
}

impl Iterator for PointCursor<'_> {
    type Item = QuantizedPoint;

    fn next(&mut self) -> Option<QuantizedPoint> {
        match self.next_point() {
            Ok(p) => p,
            Err(_) => {
                self.remaining = 0;
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn encode_varint(value: u64) -> Vec<u8> {
        let mut buf = BytesMut::new();
        put_varint(&mut buf, value);
        buf.to_vec()
    }

    #[test]
    fn test_varint_known_encodings() {
        assert_eq!(encode_varint(0), vec![0x00]);
        assert_eq!(encode_varint(127), vec![0x7F]);
        assert_eq!(encode_varint(128), vec![0x80, 0x01]);
        assert_eq!(encode_varint(300), vec![0xAC, 0x02]);
        assert_eq!(encode_varint(u64::MAX).len(), 10);
    }

    #[test]
    fn test_zigzag_known_encodings() {
        let mut buf = BytesMut::new();
        for v in [0i64, -1, 1, -2] {
            put_svarint(&mut buf, v);
        }
        assert_eq!(buf.to_vec(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_truncated_varint() {
        let mut reader = WireReader::new(&[0x80, 0x80], 0);
        assert_eq!(
            reader.read_varint(),
            Err(FeatureError::UnexpectedEof { offset: 2 })
        );
    }

    #[test]
    fn test_overlong_varint() {
        let data = [0xFF; 11];
        let mut reader = WireReader::new(&data, 0);
        assert_eq!(
            reader.read_varint(),
            Err(FeatureError::VarintOverflow { offset: 0 })
        );
    }

    #[test]
    fn test_read_bytes_past_end() {
        let mut reader = WireReader::new(&[1, 2, 3], 1);
        assert_eq!(reader.read_bytes(2), Ok(&[2u8, 3][..]));
        assert!(reader.read_bytes(1).is_err());
    }

    #[test]
    fn test_count_larger_than_record() {
        let mut data = encode_varint(5);
        data.extend_from_slice(&[0, 0]);
        let mut reader = WireReader::new(&data, 0);
        assert!(matches!(
            reader.read_count(),
            Err(FeatureError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_coord_out_of_grid() {
        let data = encode_varint(300);
        let mut reader = WireReader::new(&data, 0);
        assert_eq!(
            reader.read_coord(255),
            Err(FeatureError::CoordinateOutOfRange { offset: 0 })
        );
    }

    #[test]
    fn test_point_run_roundtrip() {
        let points = vec![
            QuantizedPoint::new(10, 20),
            QuantizedPoint::new(5, 25),
            QuantizedPoint::new(1000, 0),
        ];
        let mut buf = BytesMut::new();
        put_points(&mut buf, &points, None);

        let mut cursor = PointCursor::new(&buf, 0, points.len(), None, u32::MAX);
        let decoded: Vec<_> = cursor.by_ref().collect();
        assert_eq!(decoded, points);
        assert_eq!(cursor.position(), buf.len());
    }

    #[test]
    fn test_delta_below_zero_is_rejected() {
        let mut buf = BytesMut::new();
        put_svarint(&mut buf, -1);
        put_svarint(&mut buf, 0);
        let mut cursor = PointCursor::new(&buf, 0, 1, Some(QuantizedPoint::new(0, 0)), 255);
        assert!(matches!(
            cursor.next_point(),
            Err(FeatureError::CoordinateOutOfRange { .. })
        ));
    }

    proptest! {
        /// Property: every u64 survives a varint round trip.
        #[test]
        fn prop_varint_roundtrip(value in any::<u64>()) {
            let data = encode_varint(value);
            let mut reader = WireReader::new(&data, 0);
            prop_assert_eq!(reader.read_varint(), Ok(value));
            prop_assert_eq!(reader.remaining(), 0);
        }

        /// Property: every i64 survives a zigzag round trip.
        #[test]
        fn prop_svarint_roundtrip(value in any::<i64>()) {
            let mut buf = BytesMut::new();
            put_svarint(&mut buf, value);
            let mut reader = WireReader::new(&buf, 0);
            prop_assert_eq!(reader.read_svarint(), Ok(value));
        }
    }
}
