//! SBON primitives used by the pak index
//!
//! Variable-length integers, length-prefixed strings and the tagged dynamic
//! values stored in the index metadata.

use byteorder::{BigEndian, ReadBytesExt};
use serde_json::{Map, Number, Value};
use std::io::{self, Read};

use crate::{Error, Result};

/// Longest VLQ that still fits in a u64 (10 × 7 bits)
const MAX_VLQ_BYTES: usize = 10;

// Dynamic value type tags
const TYPE_NULL: u8 = 1;
const TYPE_DOUBLE: u8 = 2;
const TYPE_BOOL: u8 = 3;
const TYPE_INT: u8 = 4;
const TYPE_STRING: u8 = 5;
const TYPE_ARRAY: u8 = 6;
const TYPE_OBJECT: u8 = 7;

/// Read an unsigned VLQ (big-endian base-128, high bit = continuation)
pub fn read_vlq<R: Read>(reader: &mut R) -> Result<u64> {
    let mut value: u64 = 0;

    for _ in 0..MAX_VLQ_BYTES {
        let byte = reader.read_u8()?;
        value = (value << 7) | u64::from(byte & 0x7f);
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }

    Err(invalid_data("VLQ longer than 10 bytes"))
}

/// Read a zig-zag signed VLQ
pub fn read_vlq_signed<R: Read>(reader: &mut R) -> Result<i64> {
    let raw = read_vlq(reader)?;
    let magnitude = (raw >> 1) as i64;

    if raw & 1 == 1 {
        Ok(-magnitude - 1)
    } else {
        Ok(magnitude)
    }
}

/// Read a VLQ length-prefixed UTF-8 string
pub fn read_string<R: Read>(reader: &mut R) -> Result<String> {
    let len = read_vlq(reader)?;

    let mut buf = Vec::with_capacity(len.min(4096) as usize);
    reader.take(len).read_to_end(&mut buf)?;
    if (buf.len() as u64) < len {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("string declares {} bytes, {} available", len, buf.len()),
        )));
    }

    String::from_utf8(buf).map_err(|_| invalid_data("string is not valid UTF-8"))
}

/// Read a tagged dynamic value
pub fn read_value<R: Read>(reader: &mut R) -> Result<Value> {
    let tag = reader.read_u8()?;

    let value = match tag {
        TYPE_NULL => Value::Null,
        TYPE_DOUBLE => {
            let f = reader.read_f64::<BigEndian>()?;
            Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
        }
        TYPE_BOOL => Value::Bool(reader.read_u8()? != 0),
        TYPE_INT => Value::from(read_vlq_signed(reader)?),
        TYPE_STRING => Value::String(read_string(reader)?),
        TYPE_ARRAY => {
            let count = read_vlq(reader)?;
            let mut items = Vec::with_capacity(count.min(1024) as usize);
            for _ in 0..count {
                items.push(read_value(reader)?);
            }
            Value::Array(items)
        }
        TYPE_OBJECT => Value::Object(read_map(reader)?),
        other => return Err(Error::UnknownMetadataType(other)),
    };

    Ok(value)
}

/// Read a VLQ-counted map of string keys to dynamic values
pub fn read_map<R: Read>(reader: &mut R) -> Result<Map<String, Value>> {
    let count = read_vlq(reader)?;
    let mut map = Map::new();

    for _ in 0..count {
        let key = read_string(reader)?;
        let value = read_value(reader)?;
        map.insert(key, value);
    }

    Ok(map)
}

fn invalid_data(msg: &str) -> Error {
    Error::Io(io::Error::new(io::ErrorKind::InvalidData, msg.to_string()))
}
