use std::{
    fmt::{self, Display, Formatter},
    io::{self, Read, Write},
};

/// The byte order of an encoded integer field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

/// A type that can be decoded from a byte stream, given the byte order of the
/// surrounding structure.
pub trait ReadFromWithEndian {
    fn read_from_with_endian<T: Read>(source: &mut T, endian: Endian) -> io::Result<Self>
    where
        Self: Sized;
}

/// A type that can be encoded back into the bytes it was decoded from.
pub trait WriteToWithEndian {
    fn write_to_with_endian<T: Write>(&self, sink: &mut T, endian: Endian) -> io::Result<()>;
}

macro_rules! int_field {
    ($($ty:ty),+) => {
        $(
            impl ReadFromWithEndian for $ty {
                fn read_from_with_endian<T: Read>(source: &mut T, endian: Endian) -> io::Result<Self> {
                    let mut buf = [0u8; std::mem::size_of::<$ty>()];
                    source.read_exact(&mut buf)?;
                    Ok(match endian {
                        Endian::Little => <$ty>::from_le_bytes(buf),
                        Endian::Big => <$ty>::from_be_bytes(buf),
                    })
                }
            }

            impl WriteToWithEndian for $ty {
                fn write_to_with_endian<T: Write>(&self, sink: &mut T, endian: Endian) -> io::Result<()> {
                    match endian {
                        Endian::Little => sink.write_all(&self.to_le_bytes()),
                        Endian::Big => sink.write_all(&self.to_be_bytes()),
                    }
                }
            }
        )+
    }
}

int_field!(u8, u16, u32, u64, i8, i16, i32, i64);

/// A fixed-width text field. Decoding keeps the bytes before the first NUL and
/// discards the rest of the window without interpreting it. A window with no
/// NUL at all yields the full width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NullTerminatedString<const SIZE: usize>(pub String);

impl<const SIZE: usize> ReadFromWithEndian for NullTerminatedString<SIZE> {
    fn read_from_with_endian<T: Read>(source: &mut T, _: Endian) -> io::Result<Self> {
        let mut buf = [0u8; SIZE];
        source.read_exact(&mut buf)?;

        let len = buf.iter().position(|b| *b == 0).unwrap_or(SIZE);
        Ok(NullTerminatedString(String::from_utf8_lossy(&buf[..len]).to_string()))
    }
}

/// A 128 bit identifier. Displays in the canonical hyphenated form
/// (lowercase hex, grouped 8-4-4-4-12).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Uuid(pub [u8; 16]);

impl ReadFromWithEndian for Uuid {
    fn read_from_with_endian<T: Read>(source: &mut T, _: Endian) -> io::Result<Self> {
        let mut buf = [0u8; 16];
        source.read_exact(&mut buf)?;
        Ok(Uuid(buf))
    }
}

impl Display for Uuid {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if let 4 | 6 | 8 | 10 = i {
                write!(f, "-")?;
            }
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;

    fn round_trip<T>(bytes: &[u8], endian: Endian)
    where
        T: ReadFromWithEndian + WriteToWithEndian,
    {
        let value = T::read_from_with_endian(&mut Cursor::new(bytes.to_vec()), endian).unwrap();
        let mut out = Vec::new();
        value.write_to_with_endian(&mut out, endian).unwrap();
        assert_eq!(out, bytes);
    }

    #[test]
    fn test_int_round_trips() {
        let bytes = [0x80, 0x01, 0xfe, 0x7f, 0xaa, 0x55, 0x00, 0xff];
        for endian in [Endian::Little, Endian::Big] {
            round_trip::<u8>(&bytes[..1], endian);
            round_trip::<i8>(&bytes[..1], endian);
            round_trip::<u16>(&bytes[..2], endian);
            round_trip::<i16>(&bytes[..2], endian);
            round_trip::<u32>(&bytes[..4], endian);
            round_trip::<i32>(&bytes[..4], endian);
            round_trip::<u64>(&bytes[..8], endian);
            round_trip::<i64>(&bytes[..8], endian);
        }
    }

    #[test]
    fn test_int_byte_order() {
        let bytes = [0x00, 0x00, 0x10, 0x00];
        let le = u32::read_from_with_endian(&mut Cursor::new(bytes), Endian::Little).unwrap();
        let be = u32::read_from_with_endian(&mut Cursor::new(bytes), Endian::Big).unwrap();
        assert_eq!(le, 0x00100000);
        assert_eq!(be, 0x00001000);
    }

    #[test]
    fn test_signed_ints() {
        let value = i16::read_from_with_endian(&mut Cursor::new([0xff, 0xff]), Endian::Little).unwrap();
        assert_eq!(value, -1);

        let value = i8::read_from_with_endian(&mut Cursor::new([0x80]), Endian::Little).unwrap();
        assert_eq!(value, -128);
    }

    #[test]
    fn test_short_read_fails() {
        let err = u32::read_from_with_endian(&mut Cursor::new([0x01, 0x02]), Endian::Little).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_string_stops_at_first_nul() {
        let mut source = Cursor::new(b"abc\0xyz".to_vec());
        let value = NullTerminatedString::<7>::read_from_with_endian(&mut source, Endian::Little).unwrap();
        assert_eq!(value.0, "abc");
    }

    #[test]
    fn test_string_all_nul_is_empty() {
        let mut source = Cursor::new(vec![0u8; 5]);
        let value = NullTerminatedString::<5>::read_from_with_endian(&mut source, Endian::Little).unwrap();
        assert_eq!(value.0, "");
    }

    #[test]
    fn test_string_without_nul_keeps_full_width() {
        let mut source = Cursor::new(b"abcd".to_vec());
        let value = NullTerminatedString::<4>::read_from_with_endian(&mut source, Endian::Little).unwrap();
        assert_eq!(value.0, "abcd");
    }

    #[test]
    fn test_uuid_display() {
        let zero = Uuid([0u8; 16]);
        assert_eq!(zero.to_string(), "00000000-0000-0000-0000-000000000000");

        let mut bytes = [0u8; 16];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = i as u8;
        }
        let uuid = Uuid(bytes);
        assert_eq!(uuid.to_string(), "00010203-0405-0607-0809-0a0b0c0d0e0f");
    }
}
