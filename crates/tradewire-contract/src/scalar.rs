//! Scalar codecs: fixed wire shapes for types the schema language lacks.
//!
//! Decimals cross the wire as a four-integer tuple and timestamps as a
//! single tick count. Codecs are pure and stateless: encoding is total
//! over the domain type's valid range (the domain types enforce that
//! range at construction), and decoding rejects out-of-range tuples with
//! a typed [`MalformedScalar`] instead of panicking. A malformed tuple is
//! a codec/schema mismatch and maps to the call's terminal status, never
//! into the business-error union.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decimal::{Decimal, MAX_SCALE};

/// Bit 31 of `sign_scale`: the value is negative.
const SIGN_MASK: i32 = i32::MIN;

/// Bits 16..24 of `sign_scale`: the scale (0..=28).
const SCALE_MASK: i32 = 0x00ff_0000;

/// Every other bit of `sign_scale` must be zero on the wire.
const RESERVED_MASK: i32 = !(SIGN_MASK | SCALE_MASK);

/// Ticks are 100ns intervals counted from the Unix epoch.
pub const TICKS_PER_SECOND: u64 = 10_000_000;

/// Latest representable instant: 9999-12-31T23:59:59.9999999Z.
pub const MAX_TICKS: u64 = 2_534_023_007_999_999_999;

/// A decode failure for a scalar wire tuple.
///
/// Local and recoverable: reported to the caller through the terminal
/// status channel, never a process-fatal condition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedScalar {
    /// `sign_scale` encodes a scale beyond [`MAX_SCALE`].
    #[error("decimal scale {0} exceeds maximum of {MAX_SCALE}")]
    ScaleOutOfRange(u8),
    /// `sign_scale` has bits set outside the sign and scale fields.
    #[error("decimal sign_scale {0:#010x} has reserved bits set")]
    ReservedBits(i32),
    /// Tick count is beyond the representable timestamp range.
    #[error("timestamp ticks {0} exceed the representable range")]
    TicksOutOfRange(u64),
    /// A timestamp before the epoch cannot be represented in ticks.
    #[error("timestamp precedes the tick epoch")]
    BeforeEpoch,
}

/// Wire tuple for a decimal: 96-bit mantissa in `lo`/`mid`/`hi`
/// (little-endian 32-bit words), sign and scale packed into `sign_scale`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecimalWire {
    pub lo: i32,
    pub mid: i32,
    pub hi: i32,
    pub sign_scale: i32,
}

/// Wire tuple for a timestamp: 100ns ticks since the Unix epoch, UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampWire {
    pub ticks: u64,
}

/// A UTC instant at tick (100ns) precision.
///
/// Construction truncates sub-tick nanoseconds and rejects instants
/// outside the tick range, so every `Timestamp` is encodable and the
/// round trip through [`TimestampWire`] is exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp {
    ticks: u64,
}

impl Timestamp {
    /// Capture the current instant, truncated to tick precision.
    pub fn now() -> Self {
        // Utc::now() is always after the epoch and far below MAX_TICKS.
        Self::from_datetime(Utc::now()).unwrap_or(Timestamp { ticks: 0 })
    }

    /// Convert a chrono instant, truncating to tick precision.
    pub fn from_datetime(dt: DateTime<Utc>) -> Result<Self, MalformedScalar> {
        let secs = dt.timestamp();
        if secs < 0 {
            return Err(MalformedScalar::BeforeEpoch);
        }
        let ticks = (secs as u64)
            .checked_mul(TICKS_PER_SECOND)
            .and_then(|t| t.checked_add(u64::from(dt.timestamp_subsec_nanos()) / 100))
            .ok_or(MalformedScalar::TicksOutOfRange(u64::MAX))?;
        Self::from_ticks(ticks)
    }

    /// Construct from a raw tick count.
    pub fn from_ticks(ticks: u64) -> Result<Self, MalformedScalar> {
        if ticks > MAX_TICKS {
            return Err(MalformedScalar::TicksOutOfRange(ticks));
        }
        Ok(Self { ticks })
    }

    /// Raw tick count since the Unix epoch.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// The instant as a chrono UTC datetime.
    pub fn datetime(&self) -> DateTime<Utc> {
        let secs = (self.ticks / TICKS_PER_SECOND) as i64;
        let nanos = ((self.ticks % TICKS_PER_SECOND) * 100) as u32;
        // In range by construction: MAX_TICKS stays below chrono's ceiling.
        DateTime::from_timestamp(secs, nanos).unwrap_or_default()
    }
}

/// A pure bidirectional mapping between a domain scalar and its wire shape.
pub trait ScalarCodec {
    /// Domain-side value type.
    type Value;
    /// Fixed wire representation.
    type Wire;

    /// Encode a domain value. Total: every valid domain value encodes.
    fn encode(&self, value: &Self::Value) -> Self::Wire;

    /// Decode a wire tuple, rejecting out-of-range fields.
    fn decode(&self, wire: Self::Wire) -> Result<Self::Value, MalformedScalar>;
}

/// Codec between [`Decimal`] and [`DecimalWire`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DecimalCodec;

impl ScalarCodec for DecimalCodec {
    type Value = Decimal;
    type Wire = DecimalWire;

    fn encode(&self, value: &Decimal) -> DecimalWire {
        let mantissa = value.mantissa();
        let mut sign_scale = (i32::from(value.scale())) << 16;
        if value.is_negative() {
            sign_scale |= SIGN_MASK;
        }
        DecimalWire {
            lo: mantissa as u32 as i32,
            mid: (mantissa >> 32) as u32 as i32,
            hi: (mantissa >> 64) as u32 as i32,
            sign_scale,
        }
    }

    fn decode(&self, wire: DecimalWire) -> Result<Decimal, MalformedScalar> {
        if wire.sign_scale & RESERVED_MASK != 0 {
            return Err(MalformedScalar::ReservedBits(wire.sign_scale));
        }
        let scale = ((wire.sign_scale & SCALE_MASK) >> 16) as u8;
        if scale > MAX_SCALE {
            return Err(MalformedScalar::ScaleOutOfRange(scale));
        }
        let mantissa = (wire.lo as u32 as u128)
            | ((wire.mid as u32 as u128) << 32)
            | ((wire.hi as u32 as u128) << 64);
        let negative = wire.sign_scale & SIGN_MASK != 0;
        // Mantissa and scale are already range-checked above.
        Decimal::from_parts(mantissa, scale, negative)
            .map_err(|_| MalformedScalar::ScaleOutOfRange(scale))
    }
}

/// Codec between [`Timestamp`] and [`TimestampWire`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampCodec;

impl ScalarCodec for TimestampCodec {
    type Value = Timestamp;
    type Wire = TimestampWire;

    fn encode(&self, value: &Timestamp) -> TimestampWire {
        TimestampWire {
            ticks: value.ticks(),
        }
    }

    fn decode(&self, wire: TimestampWire) -> Result<Timestamp, MalformedScalar> {
        Timestamp::from_ticks(wire.ticks)
    }
}

/// The codec set a service binding registers once and shares across calls.
///
/// The registry is the only scalar conversion surface the generated-style
/// contract stubs go through; the closed set of accessors plays the role
/// a string-keyed `register` call would in a dynamically typed target.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalarRegistry {
    decimal: DecimalCodec,
    timestamp: TimestampCodec,
}

impl ScalarRegistry {
    /// Registry with the standard decimal and timestamp codecs.
    pub fn standard() -> Self {
        Self::default()
    }

    /// The decimal codec.
    pub fn decimal(&self) -> &DecimalCodec {
        &self.decimal
    }

    /// The timestamp codec.
    pub fn timestamp(&self) -> &TimestampCodec {
        &self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twelve_with_two_places_encodes_to_documented_tuple() {
        let d: Decimal = "12.00".parse().unwrap();
        let wire = DecimalCodec.encode(&d);
        assert_eq!(wire.lo, 1200);
        assert_eq!(wire.mid, 0);
        assert_eq!(wire.hi, 0);
        assert_eq!(wire.sign_scale, 0x0002_0000);
    }

    #[test]
    fn test_negative_sign_bit() {
        let d: Decimal = "-1.00".parse().unwrap();
        let wire = DecimalCodec.encode(&d);
        assert_eq!(wire.lo, 100);
        assert_eq!(wire.sign_scale as u32, 0x8002_0000);
        assert_eq!(DecimalCodec.decode(wire).unwrap(), d);
    }

    #[test]
    fn test_wide_mantissa_spans_words() {
        let d = Decimal::from_parts((1u128 << 96) - 1, 0, false).unwrap();
        let wire = DecimalCodec.encode(&d);
        assert_eq!(wire.lo, -1);
        assert_eq!(wire.mid, -1);
        assert_eq!(wire.hi, -1);
        assert_eq!(DecimalCodec.decode(wire).unwrap(), d);
    }

    #[test]
    fn test_decode_rejects_oversized_scale() {
        let wire = DecimalWire {
            lo: 1,
            mid: 0,
            hi: 0,
            sign_scale: 29 << 16,
        };
        assert_eq!(
            DecimalCodec.decode(wire),
            Err(MalformedScalar::ScaleOutOfRange(29))
        );
    }

    #[test]
    fn test_decode_rejects_reserved_bits() {
        let wire = DecimalWire {
            lo: 1,
            mid: 0,
            hi: 0,
            sign_scale: 0x0002_0001,
        };
        assert!(matches!(
            DecimalCodec.decode(wire),
            Err(MalformedScalar::ReservedBits(_))
        ));
    }

    #[test]
    fn test_timestamp_roundtrip_at_tick_precision() {
        let ts = Timestamp::from_ticks(1_234_567_890_123_456_7).unwrap();
        let wire = TimestampCodec.encode(&ts);
        assert_eq!(TimestampCodec.decode(wire).unwrap(), ts);
        assert_eq!(ts.datetime().timestamp(), (ts.ticks() / TICKS_PER_SECOND) as i64);
    }

    #[test]
    fn test_timestamp_truncates_sub_tick_nanos() {
        let dt = DateTime::from_timestamp(1_700_000_000, 123_456_789).unwrap();
        let ts = Timestamp::from_datetime(dt).unwrap();
        assert_eq!(ts.ticks() % TICKS_PER_SECOND, 1_234_567);
    }

    #[test]
    fn test_timestamp_rejects_out_of_range_ticks() {
        assert_eq!(
            TimestampCodec.decode(TimestampWire {
                ticks: MAX_TICKS + 1
            }),
            Err(MalformedScalar::TicksOutOfRange(MAX_TICKS + 1))
        );
    }

    #[test]
    fn test_timestamp_rejects_pre_epoch() {
        let dt = DateTime::from_timestamp(-1, 0).unwrap();
        assert_eq!(
            Timestamp::from_datetime(dt),
            Err(MalformedScalar::BeforeEpoch)
        );
    }
}
