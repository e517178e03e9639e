//! Metadata table stream parsing.
//!
//! Only the tables the report needs are materialized as rows; everything
//! else in the stream is skipped by its computed row size so the parse
//! stays positioned correctly.

use crate::meta::cursor::Cursor;
use crate::meta::error::{Error, Result};

/// Table identifiers (ECMA-335 II.22).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TableId {
    Module = 0x00,
    TypeRef = 0x01,
    TypeDef = 0x02,
    FieldPtr = 0x03,
    Field = 0x04,
    MethodPtr = 0x05,
    MethodDef = 0x06,
    ParamPtr = 0x07,
    Param = 0x08,
    InterfaceImpl = 0x09,
    MemberRef = 0x0A,
    Constant = 0x0B,
    CustomAttribute = 0x0C,
    FieldMarshal = 0x0D,
    DeclSecurity = 0x0E,
    ClassLayout = 0x0F,
    FieldLayout = 0x10,
    StandAloneSig = 0x11,
    EventMap = 0x12,
    EventPtr = 0x13,
    Event = 0x14,
    PropertyMap = 0x15,
    PropertyPtr = 0x16,
    Property = 0x17,
    MethodSemantics = 0x18,
    MethodImpl = 0x19,
    ModuleRef = 0x1A,
    TypeSpec = 0x1B,
    ImplMap = 0x1C,
    FieldRva = 0x1D,
    EncLog = 0x1E,
    EncMap = 0x1F,
    Assembly = 0x20,
    AssemblyProcessor = 0x21,
    AssemblyOs = 0x22,
    AssemblyRef = 0x23,
    AssemblyRefProcessor = 0x24,
    AssemblyRefOs = 0x25,
    File = 0x26,
    ExportedType = 0x27,
    ManifestResource = 0x28,
    NestedClass = 0x29,
    GenericParam = 0x2A,
    MethodSpec = 0x2B,
    GenericParamConstraint = 0x2C,
}

impl TableId {
    pub fn from_u8(value: u8) -> Option<Self> {
        const ALL: [TableId; 45] = [
            TableId::Module,
            TableId::TypeRef,
            TableId::TypeDef,
            TableId::FieldPtr,
            TableId::Field,
            TableId::MethodPtr,
            TableId::MethodDef,
            TableId::ParamPtr,
            TableId::Param,
            TableId::InterfaceImpl,
            TableId::MemberRef,
            TableId::Constant,
            TableId::CustomAttribute,
            TableId::FieldMarshal,
            TableId::DeclSecurity,
            TableId::ClassLayout,
            TableId::FieldLayout,
            TableId::StandAloneSig,
            TableId::EventMap,
            TableId::EventPtr,
            TableId::Event,
            TableId::PropertyMap,
            TableId::PropertyPtr,
            TableId::Property,
            TableId::MethodSemantics,
            TableId::MethodImpl,
            TableId::ModuleRef,
            TableId::TypeSpec,
            TableId::ImplMap,
            TableId::FieldRva,
            TableId::EncLog,
            TableId::EncMap,
            TableId::Assembly,
            TableId::AssemblyProcessor,
            TableId::AssemblyOs,
            TableId::AssemblyRef,
            TableId::AssemblyRefProcessor,
            TableId::AssemblyRefOs,
            TableId::File,
            TableId::ExportedType,
            TableId::ManifestResource,
            TableId::NestedClass,
            TableId::GenericParam,
            TableId::MethodSpec,
            TableId::GenericParamConstraint,
        ];
        ALL.iter().copied().find(|&t| t as u8 == value)
    }
}

/// Coded index families (ECMA-335 II.24.2.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodedKind {
    TypeDefOrRef,
    HasConstant,
    HasCustomAttribute,
    HasFieldMarshal,
    HasDeclSecurity,
    MemberRefParent,
    HasSemantics,
    MethodDefOrRef,
    MemberForwarded,
    Implementation,
    CustomAttributeType,
    ResolutionScope,
    TypeOrMethodDef,
}

impl CodedKind {
    pub const fn tag_bits(self) -> u8 {
        match self {
            Self::HasFieldMarshal
            | Self::HasSemantics
            | Self::MethodDefOrRef
            | Self::MemberForwarded
            | Self::TypeOrMethodDef => 1,
            Self::TypeDefOrRef
            | Self::HasConstant
            | Self::HasDeclSecurity
            | Self::Implementation
            | Self::ResolutionScope => 2,
            Self::MemberRefParent | Self::CustomAttributeType => 3,
            Self::HasCustomAttribute => 5,
        }
    }

    /// Tables this family can point into, in tag order. `None` marks tags
    /// reserved by the standard.
    pub const fn members(self) -> &'static [Option<TableId>] {
        match self {
            Self::TypeDefOrRef => &[
                Some(TableId::TypeDef),
                Some(TableId::TypeRef),
                Some(TableId::TypeSpec),
            ],
            Self::HasConstant => &[
                Some(TableId::Field),
                Some(TableId::Param),
                Some(TableId::Property),
            ],
            Self::HasCustomAttribute => &[
                Some(TableId::MethodDef),
                Some(TableId::Field),
                Some(TableId::TypeRef),
                Some(TableId::TypeDef),
                Some(TableId::Param),
                Some(TableId::InterfaceImpl),
                Some(TableId::MemberRef),
                Some(TableId::Module),
                None,
                Some(TableId::Property),
                Some(TableId::Event),
                Some(TableId::StandAloneSig),
                Some(TableId::ModuleRef),
                Some(TableId::TypeSpec),
                Some(TableId::Assembly),
                Some(TableId::AssemblyRef),
                Some(TableId::File),
                Some(TableId::ExportedType),
                Some(TableId::ManifestResource),
                Some(TableId::GenericParam),
                Some(TableId::GenericParamConstraint),
                Some(TableId::MethodSpec),
            ],
            Self::HasFieldMarshal => &[Some(TableId::Field), Some(TableId::Param)],
            Self::HasDeclSecurity => &[
                Some(TableId::TypeDef),
                Some(TableId::MethodDef),
                Some(TableId::Assembly),
            ],
            Self::MemberRefParent => &[
                Some(TableId::TypeDef),
                Some(TableId::TypeRef),
                Some(TableId::ModuleRef),
                Some(TableId::MethodDef),
                Some(TableId::TypeSpec),
            ],
            Self::HasSemantics => &[Some(TableId::Event), Some(TableId::Property)],
            Self::MethodDefOrRef => &[Some(TableId::MethodDef), Some(TableId::MemberRef)],
            Self::MemberForwarded => &[Some(TableId::Field), Some(TableId::MethodDef)],
            Self::Implementation => &[
                Some(TableId::File),
                Some(TableId::AssemblyRef),
                Some(TableId::ExportedType),
            ],
            Self::CustomAttributeType => &[
                None,
                None,
                Some(TableId::MethodDef),
                Some(TableId::MemberRef),
                None,
            ],
            Self::ResolutionScope => &[
                Some(TableId::Module),
                Some(TableId::ModuleRef),
                Some(TableId::AssemblyRef),
                Some(TableId::TypeRef),
            ],
            Self::TypeOrMethodDef => &[Some(TableId::TypeDef), Some(TableId::MethodDef)],
        }
    }

    /// Largest row count still addressable with a 2-byte coded index.
    pub const fn small_limit(self) -> u32 {
        1u32 << (16 - self.tag_bits())
    }
}

/// A decoded coded index: target table plus 1-based row (0 is null).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Coded {
    pub table: Option<TableId>,
    pub row: u32,
}

impl Coded {
    pub fn decode(kind: CodedKind, value: u32) -> Self {
        let bits = kind.tag_bits();
        let tag = (value & ((1u32 << bits) - 1)) as usize;
        Self {
            table: kind.members().get(tag).copied().flatten(),
            row: value >> bits,
        }
    }

    pub fn is_null(&self) -> bool {
        self.row == 0
    }
}

/// The #~ stream header.
#[derive(Debug, Clone)]
pub struct TablesHeader {
    pub heap_sizes: u8,
    pub valid: u64,
    pub row_counts: [u32; 64],
}

impl TablesHeader {
    pub fn parse(cur: &mut Cursor<'_>) -> Result<Self> {
        cur.skip(4)?; // reserved
        cur.skip(2)?; // major/minor version
        let heap_sizes = cur.u8()?;
        cur.skip(1)?; // reserved
        let valid = cur.u64()?;
        cur.skip(8)?; // sorted bitmask, unused here

        let mut row_counts = [0u32; 64];
        for (i, count) in row_counts.iter_mut().enumerate() {
            if valid & (1u64 << i) != 0 {
                if i > TableId::GenericParamConstraint as usize {
                    return Err(Error::UnknownTable(i as u8));
                }
                *count = cur.u32()?;
            }
        }

        Ok(Self {
            heap_sizes,
            valid,
            row_counts,
        })
    }

    pub fn row_count(&self, table: TableId) -> u32 {
        self.row_counts[table as usize]
    }

    pub fn layout(&self) -> Layout {
        Layout {
            heap_sizes: self.heap_sizes,
            row_counts: self.row_counts,
        }
    }
}

/// Index widths derived from heap sizes and row counts.
#[derive(Debug, Clone)]
pub struct Layout {
    heap_sizes: u8,
    row_counts: [u32; 64],
}

impl Layout {
    pub fn wide_strings(&self) -> bool {
        self.heap_sizes & 0x01 != 0
    }

    pub fn wide_guids(&self) -> bool {
        self.heap_sizes & 0x02 != 0
    }

    pub fn wide_blobs(&self) -> bool {
        self.heap_sizes & 0x04 != 0
    }

    pub fn wide_index(&self, table: TableId) -> bool {
        self.row_counts[table as usize] > 0xFFFF
    }

    pub fn wide_coded(&self, kind: CodedKind) -> bool {
        let limit = kind.small_limit();
        kind.members()
            .iter()
            .filter_map(|&t| t)
            .any(|t| self.row_counts[t as usize] >= limit)
    }

    fn string_size(&self) -> usize {
        if self.wide_strings() { 4 } else { 2 }
    }

    fn guid_size(&self) -> usize {
        if self.wide_guids() { 4 } else { 2 }
    }

    fn blob_size(&self) -> usize {
        if self.wide_blobs() { 4 } else { 2 }
    }

    fn index_size(&self, table: TableId) -> usize {
        if self.wide_index(table) { 4 } else { 2 }
    }

    fn coded_size(&self, kind: CodedKind) -> usize {
        if self.wide_coded(kind) { 4 } else { 2 }
    }

    /// Byte size of one row of `table`, used to skip tables that are not
    /// materialized.
    pub fn row_size(&self, table: TableId) -> usize {
        use CodedKind::*;
        use TableId::*;
        match table {
            Module => 2 + self.string_size() * 2 + self.guid_size() * 3,
            TypeRef => self.coded_size(ResolutionScope) + self.string_size() * 2,
            TypeDef => {
                4 + self.string_size() * 2
                    + self.coded_size(TypeDefOrRef)
                    + self.index_size(Field)
                    + self.index_size(MethodDef)
            }
            FieldPtr => self.index_size(Field),
            Field => 2 + self.string_size() + self.blob_size(),
            MethodPtr => self.index_size(MethodDef),
            MethodDef => 4 + 2 + 2 + self.string_size() + self.blob_size() + self.index_size(Param),
            ParamPtr => self.index_size(Param),
            Param => 2 + 2 + self.string_size(),
            InterfaceImpl => self.index_size(TypeDef) + self.coded_size(TypeDefOrRef),
            MemberRef => self.coded_size(MemberRefParent) + self.string_size() + self.blob_size(),
            Constant => 2 + self.coded_size(HasConstant) + self.blob_size(),
            CustomAttribute => {
                self.coded_size(HasCustomAttribute)
                    + self.coded_size(CustomAttributeType)
                    + self.blob_size()
            }
            FieldMarshal => self.coded_size(HasFieldMarshal) + self.blob_size(),
            DeclSecurity => 2 + self.coded_size(HasDeclSecurity) + self.blob_size(),
            ClassLayout => 2 + 4 + self.index_size(TypeDef),
            FieldLayout => 4 + self.index_size(Field),
            StandAloneSig => self.blob_size(),
            EventMap => self.index_size(TypeDef) + self.index_size(Event),
            EventPtr => self.index_size(Event),
            Event => 2 + self.string_size() + self.coded_size(TypeDefOrRef),
            PropertyMap => self.index_size(TypeDef) + self.index_size(Property),
            PropertyPtr => self.index_size(Property),
            Property => 2 + self.string_size() + self.blob_size(),
            MethodSemantics => 2 + self.index_size(MethodDef) + self.coded_size(HasSemantics),
            MethodImpl => self.index_size(TypeDef) + self.coded_size(MethodDefOrRef) * 2,
            ModuleRef => self.string_size(),
            TypeSpec => self.blob_size(),
            ImplMap => {
                2 + self.coded_size(MemberForwarded)
                    + self.string_size()
                    + self.index_size(ModuleRef)
            }
            FieldRva => 4 + self.index_size(Field),
            EncLog => 4 + 4,
            EncMap => 4,
            Assembly => 4 + 2 * 4 + 4 + self.blob_size() + self.string_size() * 2,
            AssemblyProcessor => 4,
            AssemblyOs => 4 * 3,
            AssemblyRef => 2 * 4 + 4 + self.blob_size() * 2 + self.string_size() * 2,
            AssemblyRefProcessor => 4 + self.index_size(AssemblyRef),
            AssemblyRefOs => 4 * 3 + self.index_size(AssemblyRef),
            File => 4 + self.string_size() + self.blob_size(),
            ExportedType => {
                4 + 4 + self.string_size() * 2 + self.coded_size(Implementation)
            }
            ManifestResource => {
                4 + 4 + self.string_size() + self.coded_size(Implementation)
            }
            NestedClass => self.index_size(TypeDef) * 2,
            GenericParam => 2 + 2 + self.coded_size(TypeOrMethodDef) + self.string_size(),
            MethodSpec => self.coded_size(MethodDefOrRef) + self.blob_size(),
            GenericParamConstraint => {
                self.index_size(GenericParam) + self.coded_size(TypeDefOrRef)
            }
        }
    }
}

// Row structures for the tables the report materializes. Indices into
// #Strings and #Blob are kept raw; list columns are 1-based row numbers.

/// Module table row (0x00).
#[derive(Debug, Clone, Default)]
pub struct ModuleRow {
    pub name: u32,
    pub mvid: u32,
}

impl ModuleRow {
    pub fn parse(cur: &mut Cursor<'_>, layout: &Layout) -> Result<Self> {
        cur.skip(2)?; // generation, reserved
        let name = cur.index(layout.wide_strings())?;
        let mvid = cur.index(layout.wide_guids())?;
        cur.index(layout.wide_guids())?; // enc id
        cur.index(layout.wide_guids())?; // enc base id
        Ok(Self { name, mvid })
    }
}

/// TypeRef table row (0x01).
#[derive(Debug, Clone, Default)]
pub struct TypeRefRow {
    pub scope: Coded,
    pub name: u32,
    pub namespace: u32,
}

impl TypeRefRow {
    pub fn parse(cur: &mut Cursor<'_>, layout: &Layout) -> Result<Self> {
        let scope = Coded::decode(
            CodedKind::ResolutionScope,
            cur.index(layout.wide_coded(CodedKind::ResolutionScope))?,
        );
        Ok(Self {
            scope,
            name: cur.index(layout.wide_strings())?,
            namespace: cur.index(layout.wide_strings())?,
        })
    }
}

/// TypeDef table row (0x02).
#[derive(Debug, Clone, Default)]
pub struct TypeDefRow {
    pub flags: u32,
    pub name: u32,
    pub namespace: u32,
    pub extends: Coded,
    pub field_list: u32,
    pub method_list: u32,
}

impl TypeDefRow {
    pub fn parse(cur: &mut Cursor<'_>, layout: &Layout) -> Result<Self> {
        Ok(Self {
            flags: cur.u32()?,
            name: cur.index(layout.wide_strings())?,
            namespace: cur.index(layout.wide_strings())?,
            extends: Coded::decode(
                CodedKind::TypeDefOrRef,
                cur.index(layout.wide_coded(CodedKind::TypeDefOrRef))?,
            ),
            field_list: cur.index(layout.wide_index(TableId::Field))?,
            method_list: cur.index(layout.wide_index(TableId::MethodDef))?,
        })
    }
}

/// Field table row (0x04).
#[derive(Debug, Clone, Default)]
pub struct FieldRow {
    pub flags: u16,
    pub name: u32,
    pub signature: u32,
}

impl FieldRow {
    pub fn parse(cur: &mut Cursor<'_>, layout: &Layout) -> Result<Self> {
        Ok(Self {
            flags: cur.u16()?,
            name: cur.index(layout.wide_strings())?,
            signature: cur.index(layout.wide_blobs())?,
        })
    }
}

/// MethodDef table row (0x06).
#[derive(Debug, Clone, Default)]
pub struct MethodDefRow {
    pub flags: u16,
    pub name: u32,
    pub signature: u32,
    pub param_list: u32,
}

impl MethodDefRow {
    pub fn parse(cur: &mut Cursor<'_>, layout: &Layout) -> Result<Self> {
        cur.skip(4)?; // rva
        cur.skip(2)?; // impl flags
        Ok(Self {
            flags: cur.u16()?,
            name: cur.index(layout.wide_strings())?,
            signature: cur.index(layout.wide_blobs())?,
            param_list: cur.index(layout.wide_index(TableId::Param))?,
        })
    }
}

/// Param table row (0x08).
#[derive(Debug, Clone, Default)]
pub struct ParamRow {
    pub sequence: u16,
    pub name: u32,
}

impl ParamRow {
    pub fn parse(cur: &mut Cursor<'_>, layout: &Layout) -> Result<Self> {
        cur.skip(2)?; // flags
        Ok(Self {
            sequence: cur.u16()?,
            name: cur.index(layout.wide_strings())?,
        })
    }
}

/// InterfaceImpl table row (0x09).
#[derive(Debug, Clone, Default)]
pub struct InterfaceImplRow {
    pub class: u32,
    pub interface: Coded,
}

impl InterfaceImplRow {
    pub fn parse(cur: &mut Cursor<'_>, layout: &Layout) -> Result<Self> {
        Ok(Self {
            class: cur.index(layout.wide_index(TableId::TypeDef))?,
            interface: Coded::decode(
                CodedKind::TypeDefOrRef,
                cur.index(layout.wide_coded(CodedKind::TypeDefOrRef))?,
            ),
        })
    }
}

/// PropertyMap table row (0x15).
#[derive(Debug, Clone, Default)]
pub struct PropertyMapRow {
    pub parent: u32,
    pub property_list: u32,
}

impl PropertyMapRow {
    pub fn parse(cur: &mut Cursor<'_>, layout: &Layout) -> Result<Self> {
        Ok(Self {
            parent: cur.index(layout.wide_index(TableId::TypeDef))?,
            property_list: cur.index(layout.wide_index(TableId::Property))?,
        })
    }
}

/// Property table row (0x17).
#[derive(Debug, Clone, Default)]
pub struct PropertyRow {
    pub flags: u16,
    pub name: u32,
    pub signature: u32,
}

impl PropertyRow {
    pub fn parse(cur: &mut Cursor<'_>, layout: &Layout) -> Result<Self> {
        Ok(Self {
            flags: cur.u16()?,
            name: cur.index(layout.wide_strings())?,
            signature: cur.index(layout.wide_blobs())?,
        })
    }
}

/// TypeSpec table row (0x1B).
#[derive(Debug, Clone, Default)]
pub struct TypeSpecRow {
    pub signature: u32,
}

impl TypeSpecRow {
    pub fn parse(cur: &mut Cursor<'_>, layout: &Layout) -> Result<Self> {
        Ok(Self {
            signature: cur.index(layout.wide_blobs())?,
        })
    }
}

/// Assembly table row (0x20).
#[derive(Debug, Clone, Default)]
pub struct AssemblyRow {
    pub version: (u16, u16, u16, u16),
    pub public_key: u32,
    pub name: u32,
    pub culture: u32,
}

impl AssemblyRow {
    pub fn parse(cur: &mut Cursor<'_>, layout: &Layout) -> Result<Self> {
        cur.skip(4)?; // hash algorithm
        let version = (cur.u16()?, cur.u16()?, cur.u16()?, cur.u16()?);
        cur.skip(4)?; // flags
        Ok(Self {
            version,
            public_key: cur.index(layout.wide_blobs())?,
            name: cur.index(layout.wide_strings())?,
            culture: cur.index(layout.wide_strings())?,
        })
    }
}

/// NestedClass table row (0x29).
#[derive(Debug, Clone, Default)]
pub struct NestedClassRow {
    pub nested: u32,
    pub enclosing: u32,
}

impl NestedClassRow {
    pub fn parse(cur: &mut Cursor<'_>, layout: &Layout) -> Result<Self> {
        Ok(Self {
            nested: cur.index(layout.wide_index(TableId::TypeDef))?,
            enclosing: cur.index(layout.wide_index(TableId::TypeDef))?,
        })
    }
}

/// GenericParam table row (0x2A).
#[derive(Debug, Clone, Default)]
pub struct GenericParamRow {
    pub number: u16,
    pub owner: Coded,
    pub name: u32,
}

impl GenericParamRow {
    pub fn parse(cur: &mut Cursor<'_>, layout: &Layout) -> Result<Self> {
        let number = cur.u16()?;
        cur.skip(2)?; // flags
        Ok(Self {
            number,
            owner: Coded::decode(
                CodedKind::TypeOrMethodDef,
                cur.index(layout.wide_coded(CodedKind::TypeOrMethodDef))?,
            ),
            name: cur.index(layout.wide_strings())?,
        })
    }
}

// Attribute flag subsets used by the report (ECMA-335 II.23.1).

/// TypeAttributes visibility mask and the two public values.
pub const TYPE_VISIBILITY_MASK: u32 = 0x0000_0007;
pub const TYPE_PUBLIC: u32 = 0x0000_0001;
pub const TYPE_NESTED_PUBLIC: u32 = 0x0000_0002;

/// FieldAttributes access mask, public value, and static bit.
pub const FIELD_ACCESS_MASK: u16 = 0x0007;
pub const FIELD_PUBLIC: u16 = 0x0006;
pub const FIELD_STATIC: u16 = 0x0010;

/// MethodAttributes access mask, public value, and modifier bits.
pub const METHOD_ACCESS_MASK: u16 = 0x0007;
pub const METHOD_PUBLIC: u16 = 0x0006;
pub const METHOD_STATIC: u16 = 0x0010;
pub const METHOD_FINAL: u16 = 0x0020;
pub const METHOD_ABSTRACT: u16 = 0x0400;
pub const METHOD_RT_SPECIAL_NAME: u16 = 0x1000;

#[cfg(test)]
mod tests {
    use super::*;

    fn narrow_layout() -> Layout {
        Layout {
            heap_sizes: 0,
            row_counts: [0u32; 64],
        }
    }

    #[test]
    fn coded_decode_splits_tag_and_row() {
        // TypeDefOrRef uses 2 tag bits; tag 1 is TypeRef.
        let coded = Coded::decode(CodedKind::TypeDefOrRef, (7 << 2) | 1);
        assert_eq!(coded.table, Some(TableId::TypeRef));
        assert_eq!(coded.row, 7);
        assert!(!coded.is_null());
        assert!(Coded::decode(CodedKind::TypeDefOrRef, 0).is_null());
    }

    #[test]
    fn coded_width_tracks_member_row_counts() {
        let mut layout = narrow_layout();
        assert!(!layout.wide_coded(CodedKind::TypeDefOrRef));
        // 2 tag bits leave 14 bits of row, so 1<<14 rows force 4 bytes.
        layout.row_counts[TableId::TypeSpec as usize] = 1 << 14;
        assert!(layout.wide_coded(CodedKind::TypeDefOrRef));
    }

    #[test]
    fn narrow_row_sizes_match_the_standard_layout() {
        let layout = narrow_layout();
        assert_eq!(layout.row_size(TableId::Module), 10);
        assert_eq!(layout.row_size(TableId::TypeRef), 6);
        assert_eq!(layout.row_size(TableId::TypeDef), 14);
        assert_eq!(layout.row_size(TableId::Field), 6);
        assert_eq!(layout.row_size(TableId::MethodDef), 14);
        assert_eq!(layout.row_size(TableId::Param), 6);
        assert_eq!(layout.row_size(TableId::InterfaceImpl), 4);
        assert_eq!(layout.row_size(TableId::PropertyMap), 4);
        assert_eq!(layout.row_size(TableId::Property), 6);
        assert_eq!(layout.row_size(TableId::Assembly), 22);
        assert_eq!(layout.row_size(TableId::AssemblyRef), 20);
        assert_eq!(layout.row_size(TableId::NestedClass), 4);
    }

    #[test]
    fn header_reads_counts_only_for_valid_tables() {
        let mut data = Vec::new();
        data.extend_from_slice(&0u32.to_le_bytes()); // reserved
        data.push(2); // major
        data.push(0); // minor
        data.push(0); // heap sizes
        data.push(1); // reserved
        let valid: u64 = (1 << 0) | (1 << 2); // Module, TypeDef
        data.extend_from_slice(&valid.to_le_bytes());
        data.extend_from_slice(&0u64.to_le_bytes()); // sorted
        data.extend_from_slice(&1u32.to_le_bytes()); // Module rows
        data.extend_from_slice(&3u32.to_le_bytes()); // TypeDef rows

        let mut cur = Cursor::new(&data);
        let header = TablesHeader::parse(&mut cur).unwrap();
        assert_eq!(header.row_count(TableId::Module), 1);
        assert_eq!(header.row_count(TableId::TypeRef), 0);
        assert_eq!(header.row_count(TableId::TypeDef), 3);
        assert_eq!(cur.remaining(), 0);
    }

    #[test]
    fn header_rejects_unknown_table_bits() {
        let mut data = Vec::new();
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&[2, 0, 0, 1]);
        let valid: u64 = 1 << 0x30; // portable PDB territory
        data.extend_from_slice(&valid.to_le_bytes());
        data.extend_from_slice(&0u64.to_le_bytes());
        data.extend_from_slice(&1u32.to_le_bytes());

        let mut cur = Cursor::new(&data);
        assert!(matches!(
            TablesHeader::parse(&mut cur),
            Err(Error::UnknownTable(0x30))
        ));
    }
}
