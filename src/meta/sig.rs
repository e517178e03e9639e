//! Signature blob decoding (ECMA-335 II.23.2).
//!
//! Signatures are parsed into a small type tree; rendering them as
//! C#-style names happens in [`crate::meta::image`], which has the
//! tables needed to resolve type references.

use crate::meta::cursor::Cursor;
use crate::meta::error::{Error, Result};

// Calling convention bits (II.23.2.1).
const CC_MASK: u8 = 0x0F;
const CC_FIELD: u8 = 0x06;
const CC_PROPERTY: u8 = 0x08;
const CC_GENERIC: u8 = 0x10;
const CC_HAS_THIS: u8 = 0x20;

const SENTINEL: u8 = 0x41;

/// Primitive element types with direct C# keyword spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prim {
    Void,
    Bool,
    Char,
    I1,
    U1,
    I2,
    U2,
    I4,
    U4,
    I8,
    U8,
    R4,
    R8,
    Str,
    Obj,
    IntPtr,
    UIntPtr,
    TypedRef,
}

impl Prim {
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Void => "void",
            Self::Bool => "bool",
            Self::Char => "char",
            Self::I1 => "sbyte",
            Self::U1 => "byte",
            Self::I2 => "short",
            Self::U2 => "ushort",
            Self::I4 => "int",
            Self::U4 => "uint",
            Self::I8 => "long",
            Self::U8 => "ulong",
            Self::R4 => "float",
            Self::R8 => "double",
            Self::Str => "string",
            Self::Obj => "object",
            Self::IntPtr => "nint",
            Self::UIntPtr => "nuint",
            Self::TypedRef => "typedref",
        }
    }

    fn from_elem(elem: u8) -> Option<Self> {
        Some(match elem {
            0x01 => Self::Void,
            0x02 => Self::Bool,
            0x03 => Self::Char,
            0x04 => Self::I1,
            0x05 => Self::U1,
            0x06 => Self::I2,
            0x07 => Self::U2,
            0x08 => Self::I4,
            0x09 => Self::U4,
            0x0A => Self::I8,
            0x0B => Self::U8,
            0x0C => Self::R4,
            0x0D => Self::R8,
            0x0E => Self::Str,
            0x16 => Self::TypedRef,
            0x18 => Self::IntPtr,
            0x19 => Self::UIntPtr,
            0x1C => Self::Obj,
            _ => return None,
        })
    }
}

/// A decoded type from a signature blob.
///
/// Class and value-type references carry the raw TypeDefOrRef token
/// from the blob (tag in the low 2 bits, row above).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSig {
    Prim(Prim),
    Class(u32),
    ValueType(u32),
    SzArray(Box<TypeSig>),
    Array { elem: Box<TypeSig>, rank: u32 },
    Ptr(Box<TypeSig>),
    ByRef(Box<TypeSig>),
    Generic { token: u32, args: Vec<TypeSig> },
    /// Generic parameter of the enclosing type.
    Var(u32),
    /// Generic parameter of the method itself.
    MVar(u32),
    FnPtr,
}

impl TypeSig {
    pub fn parse(cur: &mut Cursor<'_>) -> Result<Self> {
        let at = cur.position();
        let elem = cur.u8()?;
        if let Some(prim) = Prim::from_elem(elem) {
            return Ok(TypeSig::Prim(prim));
        }
        match elem {
            // Class / ValueType: TypeDefOrRef token follows
            0x12 => Ok(TypeSig::Class(cur.compressed_u32()?)),
            0x11 => Ok(TypeSig::ValueType(cur.compressed_u32()?)),

            // SzArray
            0x1D => Ok(TypeSig::SzArray(Box::new(TypeSig::parse(cur)?))),

            // Array: rank, then size and bound lists we only need to consume
            0x14 => {
                let elem = Box::new(TypeSig::parse(cur)?);
                let rank = cur.compressed_u32()?;
                let sizes = cur.compressed_u32()?;
                for _ in 0..sizes {
                    cur.compressed_u32()?;
                }
                let bounds = cur.compressed_u32()?;
                for _ in 0..bounds {
                    cur.compressed_u32()?;
                }
                Ok(TypeSig::Array { elem, rank })
            }

            0x0F => Ok(TypeSig::Ptr(Box::new(TypeSig::parse(cur)?))),
            0x10 => Ok(TypeSig::ByRef(Box::new(TypeSig::parse(cur)?))),

            // GenericInst: class-or-valuetype byte, token, arg list
            0x15 => {
                cur.u8()?;
                let token = cur.compressed_u32()?;
                let count = cur.compressed_u32()?;
                let mut args = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    args.push(TypeSig::parse(cur)?);
                }
                Ok(TypeSig::Generic { token, args })
            }

            0x13 => Ok(TypeSig::Var(cur.compressed_u32()?)),
            0x1E => Ok(TypeSig::MVar(cur.compressed_u32()?)),

            // FnPtr: a full nested method signature we consume but render opaquely
            0x1B => {
                MethodSig::parse(cur)?;
                Ok(TypeSig::FnPtr)
            }

            // modreq/modopt wrap a token plus the real type
            0x1F | 0x20 => {
                cur.compressed_u32()?;
                TypeSig::parse(cur)
            }

            // Pinned wraps the real type
            0x45 => TypeSig::parse(cur),

            _ => Err(Error::BadSignature(at)),
        }
    }
}

/// A decoded method signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSig {
    pub has_this: bool,
    pub generic_arity: u32,
    pub ret: TypeSig,
    pub params: Vec<TypeSig>,
}

impl MethodSig {
    pub fn parse(cur: &mut Cursor<'_>) -> Result<Self> {
        let cc = cur.u8()?;
        let generic_arity = if cc & CC_GENERIC != 0 {
            cur.compressed_u32()?
        } else {
            0
        };
        let count = cur.compressed_u32()?;
        let ret = TypeSig::parse(cur)?;
        let mut params = Vec::with_capacity(count as usize);
        for _ in 0..count {
            if cur.remaining() > 0 && cur.peek()? == SENTINEL {
                cur.u8()?; // vararg boundary
            }
            params.push(TypeSig::parse(cur)?);
        }
        Ok(Self {
            has_this: cc & CC_HAS_THIS != 0,
            generic_arity,
            ret,
            params,
        })
    }

    pub fn from_blob(blob: &[u8]) -> Result<Self> {
        Self::parse(&mut Cursor::new(blob))
    }
}

/// A decoded field signature: the field's type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSig(pub TypeSig);

impl FieldSig {
    pub fn from_blob(blob: &[u8]) -> Result<Self> {
        let mut cur = Cursor::new(blob);
        if cur.u8()? & CC_MASK != CC_FIELD {
            return Err(Error::BadSignature(0));
        }
        Ok(Self(TypeSig::parse(&mut cur)?))
    }
}

/// A decoded property signature: the property type plus indexer params.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySig {
    pub ty: TypeSig,
    pub params: Vec<TypeSig>,
}

impl PropertySig {
    pub fn from_blob(blob: &[u8]) -> Result<Self> {
        let mut cur = Cursor::new(blob);
        if cur.u8()? & CC_MASK != CC_PROPERTY {
            return Err(Error::BadSignature(0));
        }
        let count = cur.compressed_u32()?;
        let ty = TypeSig::parse(&mut cur)?;
        let mut params = Vec::with_capacity(count as usize);
        for _ in 0..count {
            params.push(TypeSig::parse(&mut cur)?);
        }
        Ok(Self { ty, params })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_sig_string() {
        let sig = FieldSig::from_blob(&[0x06, 0x0E]).unwrap();
        assert_eq!(sig.0, TypeSig::Prim(Prim::Str));
    }

    #[test]
    fn field_sig_rejects_wrong_convention() {
        assert!(FieldSig::from_blob(&[0x20, 0x0E]).is_err());
    }

    #[test]
    fn instance_method_returning_string() {
        // hasthis, 0 params, ret string
        let sig = MethodSig::from_blob(&[0x20, 0x00, 0x0E]).unwrap();
        assert!(sig.has_this);
        assert_eq!(sig.ret, TypeSig::Prim(Prim::Str));
        assert!(sig.params.is_empty());
    }

    #[test]
    fn static_method_with_params() {
        // default cc, 2 params, ret bool, params (string, int[])
        let sig = MethodSig::from_blob(&[0x00, 0x02, 0x02, 0x0E, 0x1D, 0x08]).unwrap();
        assert!(!sig.has_this);
        assert_eq!(sig.ret, TypeSig::Prim(Prim::Bool));
        assert_eq!(
            sig.params,
            vec![
                TypeSig::Prim(Prim::Str),
                TypeSig::SzArray(Box::new(TypeSig::Prim(Prim::I4))),
            ]
        );
    }

    #[test]
    fn generic_instantiation_with_mvar() {
        // generic | hasthis cc, 1 generic arg, 1 param, ret void,
        // param IEnumerable<!!0> over TypeRef row 3 (token (3<<2)|1 = 0x0D)
        let blob = [0x30, 0x01, 0x01, 0x01, 0x15, 0x12, 0x0D, 0x01, 0x1E, 0x00];
        let sig = MethodSig::from_blob(&blob).unwrap();
        assert_eq!(sig.generic_arity, 1);
        assert_eq!(
            sig.params,
            vec![TypeSig::Generic {
                token: 0x0D,
                args: vec![TypeSig::MVar(0)],
            }]
        );
    }

    #[test]
    fn modifiers_are_transparent() {
        // modreq(token) int
        let mut cur = Cursor::new(&[0x1F, 0x11, 0x08]);
        assert_eq!(TypeSig::parse(&mut cur).unwrap(), TypeSig::Prim(Prim::I4));
    }

    #[test]
    fn property_sig_with_indexer_param() {
        // property | hasthis, 1 param, type char, param int
        let sig = PropertySig::from_blob(&[0x28, 0x01, 0x03, 0x08]).unwrap();
        assert_eq!(sig.ty, TypeSig::Prim(Prim::Char));
        assert_eq!(sig.params, vec![TypeSig::Prim(Prim::I4)]);
    }
}
