//! Parsed module metadata and the queries the report is built from.

use std::fs::File;
use std::path::Path;

use crate::meta::crypto;
use crate::meta::cursor::Cursor;
use crate::meta::error::{Error, Result};
use crate::meta::heaps::{BlobHeap, GuidHeap, StringHeap};
use crate::meta::pe;
use crate::meta::sig::{FieldSig, MethodSig, PropertySig, TypeSig};
use crate::meta::tables::{
    AssemblyRow, Coded, FieldRow, GenericParamRow, InterfaceImplRow, Layout, MethodDefRow,
    ModuleRow, NestedClassRow, ParamRow, PropertyMapRow, PropertyRow, TableId, TablesHeader,
    TypeDefRow, TypeRefRow, TypeSpecRow, FIELD_ACCESS_MASK, FIELD_PUBLIC, METHOD_ABSTRACT,
    METHOD_ACCESS_MASK, METHOD_FINAL, METHOD_PUBLIC, METHOD_RT_SPECIAL_NAME, METHOD_STATIC,
    TYPE_NESTED_PUBLIC, TYPE_PUBLIC, TYPE_VISIBILITY_MASK,
};

/// BSJB signature at the start of the metadata root.
const METADATA_MAGIC: u32 = 0x424A_5342;

/// Files at least this large are memory-mapped instead of read whole.
const MMAP_THRESHOLD: u64 = 4 * 1024 * 1024;

/// Bound on nested-class chains, against malformed NestedClass cycles.
const MAX_NESTING: usize = 64;

/// A public field, ready for the report.
#[derive(Debug, Clone)]
pub struct FieldInfo {
    pub name: String,
    pub ty: String,
}

/// A property and the visibility of its type.
#[derive(Debug, Clone)]
pub struct PropertyInfo {
    pub name: String,
    pub ty: String,
    pub public_type: bool,
}

/// A public method, ready for the report.
#[derive(Debug, Clone)]
pub struct MethodInfo {
    pub name: String,
    pub is_static: bool,
    pub is_final: bool,
    pub is_abstract: bool,
    pub ret: String,
    pub params: Vec<String>,
}

/// One module's parsed metadata.
#[derive(Debug, Default)]
pub struct Image {
    strings: StringHeap,
    blobs: BlobHeap,
    guids: GuidHeap,
    module: ModuleRow,
    type_refs: Vec<TypeRefRow>,
    type_defs: Vec<TypeDefRow>,
    fields: Vec<FieldRow>,
    methods: Vec<MethodDefRow>,
    params: Vec<ParamRow>,
    interface_impls: Vec<InterfaceImplRow>,
    property_maps: Vec<PropertyMapRow>,
    properties: Vec<PropertyRow>,
    type_specs: Vec<TypeSpecRow>,
    assembly: Option<AssemblyRow>,
    nested_classes: Vec<NestedClassRow>,
    generic_params: Vec<GenericParamRow>,
}

impl Image {
    /// Load and parse the module at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        if len >= MMAP_THRESHOLD {
            // Safety: file is not mutated while mapped; read-only map
            if let Ok(map) = unsafe { memmap2::Mmap::map(&file) } {
                return Self::parse(&map);
            }
        }
        drop(file);
        Self::parse(&std::fs::read(path)?)
    }

    /// Parse a whole PE image held in memory.
    pub fn parse(data: &[u8]) -> Result<Self> {
        Self::parse_metadata(pe::clr_metadata(data)?)
    }

    /// Parse raw metadata bytes (BSJB root onward).
    pub fn parse_metadata(meta: &[u8]) -> Result<Self> {
        let mut cur = Cursor::new(meta);
        let magic = cur.u32()?;
        if magic != METADATA_MAGIC {
            return Err(Error::BadMagic {
                what: "metadata root",
                expected: METADATA_MAGIC,
                found: magic,
            });
        }
        cur.skip(4)?; // major/minor version
        cur.skip(4)?; // reserved
        let version_len = cur.u32()? as usize;
        cur.skip(version_len)?; // runtime version string, padded
        cur.skip(2)?; // flags
        let stream_count = cur.u16()? as usize;

        let mut streams = Vec::with_capacity(stream_count);
        for _ in 0..stream_count {
            let offset = cur.u32()? as usize;
            let size = cur.u32()? as usize;
            let name_start = cur.position();
            let name = cur.cstr()?.to_string();
            // Stream names are padded to a 4-byte boundary
            let consumed = cur.position() - name_start;
            cur.skip(consumed.wrapping_neg() & 3)?;
            streams.push((name, offset, size));
        }

        let stream = |wanted: &str| -> Option<&[u8]> {
            streams
                .iter()
                .find(|(name, ..)| name.as_str() == wanted)
                .and_then(|&(_, offset, size)| meta.get(offset..offset + size))
        };

        // Heaps may be absent in degenerate modules; the tables stream may not.
        let strings = stream("#Strings").map(StringHeap::parse).unwrap_or_default();
        let blobs = stream("#Blob").map(BlobHeap::parse).unwrap_or_default();
        let guids = stream("#GUID").map(GuidHeap::parse).unwrap_or_default();
        let tables = stream("#~")
            .or_else(|| stream("#-"))
            .ok_or(Error::MissingStream("#~"))?;

        let mut image = Self {
            strings,
            blobs,
            guids,
            ..Self::default()
        };
        image.parse_tables(tables)?;
        Ok(image)
    }

    /// Parse the #~ stream: materialize the tables the report needs and
    /// step over everything between them.
    fn parse_tables(&mut self, data: &[u8]) -> Result<()> {
        let mut cur = Cursor::new(data);
        let header = TablesHeader::parse(&mut cur)?;
        let layout = header.layout();

        let count = |id: TableId| header.row_count(id) as usize;
        let skip = |cur: &mut Cursor<'_>, id: TableId| -> Result<()> {
            cur.skip(count(id) * layout.row_size(id))
        };

        self.module = rows(&mut cur, &layout, count(TableId::Module), ModuleRow::parse)?
            .into_iter()
            .next()
            .unwrap_or_default();
        self.type_refs = rows(&mut cur, &layout, count(TableId::TypeRef), TypeRefRow::parse)?;
        self.type_defs = rows(&mut cur, &layout, count(TableId::TypeDef), TypeDefRow::parse)?;
        skip(&mut cur, TableId::FieldPtr)?;
        self.fields = rows(&mut cur, &layout, count(TableId::Field), FieldRow::parse)?;
        skip(&mut cur, TableId::MethodPtr)?;
        self.methods = rows(
            &mut cur,
            &layout,
            count(TableId::MethodDef),
            MethodDefRow::parse,
        )?;
        skip(&mut cur, TableId::ParamPtr)?;
        self.params = rows(&mut cur, &layout, count(TableId::Param), ParamRow::parse)?;
        self.interface_impls = rows(
            &mut cur,
            &layout,
            count(TableId::InterfaceImpl),
            InterfaceImplRow::parse,
        )?;
        for id in [
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
        ] {
            skip(&mut cur, id)?;
        }
        self.property_maps = rows(
            &mut cur,
            &layout,
            count(TableId::PropertyMap),
            PropertyMapRow::parse,
        )?;
        skip(&mut cur, TableId::PropertyPtr)?;
        self.properties = rows(
            &mut cur,
            &layout,
            count(TableId::Property),
            PropertyRow::parse,
        )?;
        for id in [
            TableId::MethodSemantics,
            TableId::MethodImpl,
            TableId::ModuleRef,
        ] {
            skip(&mut cur, id)?;
        }
        self.type_specs = rows(
            &mut cur,
            &layout,
            count(TableId::TypeSpec),
            TypeSpecRow::parse,
        )?;
        for id in [
            TableId::ImplMap,
            TableId::FieldRva,
            TableId::EncLog,
            TableId::EncMap,
        ] {
            skip(&mut cur, id)?;
        }
        self.assembly = rows(
            &mut cur,
            &layout,
            count(TableId::Assembly),
            AssemblyRow::parse,
        )?
        .into_iter()
        .next();
        for id in [
            TableId::AssemblyProcessor,
            TableId::AssemblyOs,
            TableId::AssemblyRef,
            TableId::AssemblyRefProcessor,
            TableId::AssemblyRefOs,
            TableId::File,
            TableId::ExportedType,
            TableId::ManifestResource,
        ] {
            skip(&mut cur, id)?;
        }
        self.nested_classes = rows(
            &mut cur,
            &layout,
            count(TableId::NestedClass),
            NestedClassRow::parse,
        )?;
        self.generic_params = rows(
            &mut cur,
            &layout,
            count(TableId::GenericParam),
            GenericParamRow::parse,
        )?;
        // MethodSpec and GenericParamConstraint follow; nothing past here is needed.

        Ok(())
    }

    /// Full identity of the module: the assembly display name, or the
    /// module file name for netmodules without an Assembly row.
    pub fn identity(&self) -> String {
        let Some(asm) = &self.assembly else {
            return self.str_at(self.module.name).to_string();
        };
        let name = self.str_at(asm.name);
        let culture = match self.str_at(asm.culture) {
            "" => "neutral",
            c => c,
        };
        let token = self.public_key_token_hex(asm.public_key);
        let (a, b, c, d) = asm.version;
        format!("{name}, Version={a}.{b}.{c}.{d}, Culture={culture}, PublicKeyToken={token}")
    }

    fn public_key_token_hex(&self, blob_index: u32) -> String {
        let key = match self.blobs.get(blob_index) {
            Ok(key) if !key.is_empty() => key,
            _ => return "null".to_string(),
        };
        crypto::public_key_token(key)
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect()
    }

    /// Number of type definitions in the module.
    pub fn type_count(&self) -> usize {
        self.type_defs.len()
    }

    /// The module version id GUID, when the module declares one.
    pub fn mvid(&self) -> Option<[u8; 16]> {
        self.guids.get(self.module.mvid).ok()
    }

    /// Fully qualified name of the TypeDef at `idx` (0-based), with
    /// nested types spelled `Enclosing+Nested`.
    pub fn type_full_name(&self, idx: usize) -> String {
        self.full_name_bounded(idx, MAX_NESTING)
    }

    fn full_name_bounded(&self, idx: usize, depth: usize) -> String {
        let Some(row) = self.type_defs.get(idx) else {
            return String::new();
        };
        let name = self.str_at(row.name);
        if depth > 0 {
            if let Some(nc) = self
                .nested_classes
                .iter()
                .find(|nc| nc.nested == idx as u32 + 1)
            {
                let enclosing = nc.enclosing as usize;
                if enclosing != 0 && enclosing != idx + 1 {
                    let outer = self.full_name_bounded(enclosing - 1, depth - 1);
                    return format!("{outer}+{name}");
                }
            }
        }
        match self.str_at(row.namespace) {
            "" => name.to_string(),
            ns => format!("{ns}.{name}"),
        }
    }

    /// Find a TypeDef by fully qualified name. Case-sensitive.
    pub fn find_type(&self, full_name: &str) -> Option<usize> {
        (0..self.type_defs.len()).find(|&i| self.type_full_name(i) == full_name)
    }

    /// Names of the interfaces the type at `idx` implements.
    pub fn interfaces_of(&self, idx: usize) -> Vec<String> {
        let scope = Scope {
            type_idx: idx,
            method_idx: None,
        };
        self.interface_impls
            .iter()
            .filter(|imp| imp.class == idx as u32 + 1)
            .map(|imp| self.coded_type_name(imp.interface, scope))
            .collect()
    }

    /// Public fields the type at `idx` declares.
    pub fn fields_of(&self, idx: usize) -> Vec<FieldInfo> {
        let scope = Scope {
            type_idx: idx,
            method_idx: None,
        };
        let range = self.list_range(
            self.type_defs[idx].field_list,
            self.type_defs.get(idx + 1).map(|t| t.field_list),
            self.fields.len(),
        );
        self.fields[range]
            .iter()
            .filter(|f| f.flags & FIELD_ACCESS_MASK == FIELD_PUBLIC)
            .map(|f| FieldInfo {
                name: self.str_at(f.name).to_string(),
                ty: self.field_type(f.signature, scope),
            })
            .collect()
    }

    fn field_type(&self, blob_index: u32, scope: Scope) -> String {
        self.blobs
            .get(blob_index)
            .ok()
            .and_then(|blob| FieldSig::from_blob(blob).ok())
            .map_or_else(|| "?".to_string(), |sig| self.render_type(&sig.0, scope))
    }

    /// Properties the type at `idx` declares, each tagged with whether
    /// its type is publicly visible.
    pub fn properties_of(&self, idx: usize) -> Vec<PropertyInfo> {
        let scope = Scope {
            type_idx: idx,
            method_idx: None,
        };
        let Some(map_pos) = self
            .property_maps
            .iter()
            .position(|m| m.parent == idx as u32 + 1)
        else {
            return Vec::new();
        };
        let range = self.list_range(
            self.property_maps[map_pos].property_list,
            self.property_maps.get(map_pos + 1).map(|m| m.property_list),
            self.properties.len(),
        );
        self.properties[range]
            .iter()
            .map(|p| {
                let sig = self
                    .blobs
                    .get(p.signature)
                    .ok()
                    .and_then(|blob| PropertySig::from_blob(blob).ok());
                let (ty, public_type) = match sig {
                    Some(sig) => (
                        self.render_type(&sig.ty, scope),
                        self.type_is_public(&sig.ty),
                    ),
                    None => ("?".to_string(), true),
                };
                PropertyInfo {
                    name: self.str_at(p.name).to_string(),
                    ty,
                    public_type,
                }
            })
            .collect()
    }

    /// Public methods the type at `idx` declares, constructors excluded.
    pub fn methods_of(&self, idx: usize) -> Vec<MethodInfo> {
        let range = self.list_range(
            self.type_defs[idx].method_list,
            self.type_defs.get(idx + 1).map(|t| t.method_list),
            self.methods.len(),
        );
        range
            .filter_map(|m| {
                let row = &self.methods[m];
                if row.flags & METHOD_ACCESS_MASK != METHOD_PUBLIC
                    || row.flags & METHOD_RT_SPECIAL_NAME != 0
                {
                    return None;
                }
                Some(self.method_info(idx, m))
            })
            .collect()
    }

    fn method_info(&self, type_idx: usize, method_idx: usize) -> MethodInfo {
        let row = &self.methods[method_idx];
        let scope = Scope {
            type_idx,
            method_idx: Some(method_idx),
        };
        let sig = self
            .blobs
            .get(row.signature)
            .ok()
            .and_then(|blob| MethodSig::from_blob(blob).ok());

        let (ret, params) = match sig {
            Some(sig) => {
                let param_range = self.list_range(
                    row.param_list,
                    self.methods.get(method_idx + 1).map(|m| m.param_list),
                    self.params.len(),
                );
                let names = &self.params[param_range];
                let params = sig
                    .params
                    .iter()
                    .enumerate()
                    .map(|(i, ty)| {
                        let rendered = self.render_type(ty, scope);
                        // Param sequence numbers are 1-based; 0 names the return value.
                        match names.iter().find(|p| p.sequence as usize == i + 1) {
                            Some(p) if p.name != 0 => {
                                format!("{rendered} {}", self.str_at(p.name))
                            }
                            _ => rendered,
                        }
                    })
                    .collect();
                (self.render_type(&sig.ret, scope), params)
            }
            None => ("?".to_string(), Vec::new()),
        };

        MethodInfo {
            name: self.str_at(row.name).to_string(),
            is_static: row.flags & METHOD_STATIC != 0,
            is_final: row.flags & METHOD_FINAL != 0,
            is_abstract: row.flags & METHOD_ABSTRACT != 0,
            ret,
            params,
        }
    }

    // ------------------------------------------------------------------
    // Name rendering
    // ------------------------------------------------------------------

    fn str_at(&self, index: u32) -> &str {
        self.strings.get(index).unwrap_or("")
    }

    fn type_ref_name(&self, row: u32) -> String {
        let Some(r) = self.type_refs.get(row as usize - 1) else {
            return "?".to_string();
        };
        match self.str_at(r.namespace) {
            "" => self.str_at(r.name).to_string(),
            ns => format!("{ns}.{}", self.str_at(r.name)),
        }
    }

    fn coded_type_name(&self, coded: Coded, scope: Scope) -> String {
        match (coded.table, coded.row) {
            (Some(TableId::TypeDef), row) if row > 0 => self.type_full_name(row as usize - 1),
            (Some(TableId::TypeRef), row) if row > 0 => self.type_ref_name(row),
            (Some(TableId::TypeSpec), row) if row > 0 => self.type_spec_name(row, scope),
            _ => "?".to_string(),
        }
    }

    fn type_spec_name(&self, row: u32, scope: Scope) -> String {
        self.type_specs
            .get(row as usize - 1)
            .and_then(|ts| self.blobs.get(ts.signature).ok())
            .and_then(|blob| TypeSig::parse(&mut Cursor::new(blob)).ok())
            .map_or_else(|| "?".to_string(), |sig| self.render_type(&sig, scope))
    }

    /// Resolve a TypeDefOrRef token embedded in a signature blob.
    fn sig_token_name(&self, token: u32, scope: Scope) -> String {
        let row = token >> 2;
        if row == 0 {
            return "?".to_string();
        }
        match token & 0x3 {
            0 => self.type_full_name(row as usize - 1),
            1 => self.type_ref_name(row),
            2 => self.type_spec_name(row, scope),
            _ => "?".to_string(),
        }
    }

    fn render_type(&self, sig: &TypeSig, scope: Scope) -> String {
        match sig {
            TypeSig::Prim(p) => p.keyword().to_string(),
            TypeSig::Class(tok) | TypeSig::ValueType(tok) => self.sig_token_name(*tok, scope),
            TypeSig::SzArray(elem) => format!("{}[]", self.render_type(elem, scope)),
            TypeSig::Array { elem, rank } => format!(
                "{}[{}]",
                self.render_type(elem, scope),
                ",".repeat(rank.saturating_sub(1) as usize)
            ),
            TypeSig::Ptr(inner) => format!("{}*", self.render_type(inner, scope)),
            TypeSig::ByRef(inner) => format!("ref {}", self.render_type(inner, scope)),
            TypeSig::Generic { token, args } => {
                let base = self.sig_token_name(*token, scope);
                // Drop the CLR arity suffix (List`1 -> List) before the args.
                let base = base.split_once('`').map_or(base.as_str(), |(b, _)| b);
                let args: Vec<String> = args.iter().map(|a| self.render_type(a, scope)).collect();
                format!("{base}<{}>", args.join(", "))
            }
            TypeSig::Var(n) => self
                .generic_param_name(TableId::TypeDef, scope.type_idx, *n)
                .unwrap_or_else(|| format!("!{n}")),
            TypeSig::MVar(n) => scope
                .method_idx
                .and_then(|m| self.generic_param_name(TableId::MethodDef, m, *n))
                .unwrap_or_else(|| format!("!!{n}")),
            TypeSig::FnPtr => "fnptr".to_string(),
        }
    }

    fn generic_param_name(&self, owner: TableId, idx: usize, number: u32) -> Option<String> {
        self.generic_params
            .iter()
            .find(|g| {
                g.owner.table == Some(owner)
                    && g.owner.row == idx as u32 + 1
                    && u32::from(g.number) == number
            })
            .map(|g| self.str_at(g.name).to_string())
    }

    /// Structural mirror of the original's `PropertyType.IsPublic` filter:
    /// a type is non-public only if it resolves to a TypeDef in this image
    /// whose visibility is neither public nor nested-public.
    fn type_is_public(&self, sig: &TypeSig) -> bool {
        match sig {
            TypeSig::Class(tok) | TypeSig::ValueType(tok) => {
                let row = tok >> 2;
                if tok & 0x3 != 0 || row == 0 {
                    return true; // TypeRef/TypeSpec: not resolvable here
                }
                let Some(def) = self.type_defs.get(row as usize - 1) else {
                    return true;
                };
                matches!(
                    def.flags & TYPE_VISIBILITY_MASK,
                    TYPE_PUBLIC | TYPE_NESTED_PUBLIC
                )
            }
            TypeSig::SzArray(inner)
            | TypeSig::Ptr(inner)
            | TypeSig::ByRef(inner)
            | TypeSig::Array { elem: inner, .. } => self.type_is_public(inner),
            TypeSig::Generic { args, .. } => args.iter().all(|a| self.type_is_public(a)),
            _ => true,
        }
    }

    /// Turn a 1-based list column plus its successor into an index range,
    /// clamped so malformed columns cannot slice out of bounds.
    fn list_range(&self, start: u32, next: Option<u32>, len: usize) -> std::ops::Range<usize> {
        let lo = (start.max(1) as usize - 1).min(len);
        let hi = (next.unwrap_or(len as u32 + 1).max(1) as usize - 1).min(len);
        lo..hi.max(lo)
    }
}

fn rows<T>(
    cur: &mut Cursor<'_>,
    layout: &Layout,
    count: usize,
    parse: impl Fn(&mut Cursor<'_>, &Layout) -> Result<T>,
) -> Result<Vec<T>> {
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        out.push(parse(cur, layout)?);
    }
    Ok(out)
}

#[derive(Debug, Clone, Copy)]
struct Scope {
    type_idx: usize,
    method_idx: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::heaps::StringHeap;
    use crate::meta::tables::FIELD_STATIC;

    // Hand-built images: string heap offsets are tracked by `intern`.
    struct Fixture {
        strings: Vec<u8>,
        image: Image,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                strings: vec![0],
                image: Image::default(),
            }
        }

        fn intern(&mut self, s: &str) -> u32 {
            let offset = self.strings.len() as u32;
            self.strings.extend_from_slice(s.as_bytes());
            self.strings.push(0);
            offset
        }

        fn finish(mut self) -> Image {
            self.image.strings = StringHeap::parse(&self.strings);
            self.image
        }
    }

    fn type_def(name: u32, namespace: u32, field_list: u32, method_list: u32) -> TypeDefRow {
        TypeDefRow {
            flags: TYPE_PUBLIC,
            name,
            namespace,
            extends: Coded::default(),
            field_list,
            method_list,
        }
    }

    #[test]
    fn full_names_join_namespace_and_name() {
        let mut fx = Fixture::new();
        let ns = fx.intern("System");
        let name = fx.intern("String");
        fx.image.type_defs.push(type_def(name, ns, 1, 1));
        let image = fx.finish();

        assert_eq!(image.type_full_name(0), "System.String");
        assert_eq!(image.find_type("System.String"), Some(0));
        assert_eq!(image.find_type("system.string"), None);
    }

    #[test]
    fn nested_types_use_plus_separator() {
        let mut fx = Fixture::new();
        let ns = fx.intern("System");
        let outer = fx.intern("Outer");
        let inner = fx.intern("Inner");
        fx.image.type_defs.push(type_def(outer, ns, 1, 1));
        fx.image.type_defs.push(type_def(inner, 0, 1, 1));
        fx.image.nested_classes.push(NestedClassRow {
            nested: 2,
            enclosing: 1,
        });
        let image = fx.finish();

        assert_eq!(image.type_full_name(1), "System.Outer+Inner");
        assert_eq!(image.find_type("System.Outer+Inner"), Some(1));
    }

    #[test]
    fn nested_class_cycle_does_not_hang() {
        let mut fx = Fixture::new();
        let a = fx.intern("A");
        let b = fx.intern("B");
        fx.image.type_defs.push(type_def(a, 0, 1, 1));
        fx.image.type_defs.push(type_def(b, 0, 1, 1));
        fx.image.nested_classes.push(NestedClassRow {
            nested: 1,
            enclosing: 2,
        });
        fx.image.nested_classes.push(NestedClassRow {
            nested: 2,
            enclosing: 1,
        });
        let image = fx.finish();

        // The name bottoms out instead of recursing forever.
        assert!(image.type_full_name(0).ends_with('A'));
    }

    #[test]
    fn list_range_clamps_malformed_columns() {
        let image = Image::default();
        assert_eq!(image.list_range(1, None, 0), 0..0);
        assert_eq!(image.list_range(1, Some(3), 2), 0..2);
        assert_eq!(image.list_range(5, Some(2), 2), 2..2);
        assert_eq!(image.list_range(0, Some(2), 3), 0..1);
    }

    #[test]
    fn identity_falls_back_to_module_name() {
        let mut fx = Fixture::new();
        let name = fx.intern("Widgets.netmodule");
        fx.image.module = ModuleRow { name, mvid: 0 };
        let image = fx.finish();
        assert_eq!(image.identity(), "Widgets.netmodule");
    }

    #[test]
    fn identity_formats_assembly_display_name() {
        let mut fx = Fixture::new();
        let name = fx.intern("Widgets");
        fx.image.assembly = Some(AssemblyRow {
            version: (5, 0, 0, 7),
            public_key: 0,
            name,
            culture: 0,
        });
        let image = fx.finish();
        assert_eq!(
            image.identity(),
            "Widgets, Version=5.0.0.7, Culture=neutral, PublicKeyToken=null"
        );
    }

    #[test]
    fn non_public_fields_are_dropped() {
        let mut fx = Fixture::new();
        let ns = fx.intern("N");
        let ty = fx.intern("T");
        let pub_name = fx.intern("Visible");
        let priv_name = fx.intern("Hidden");
        fx.image.type_defs.push(type_def(ty, ns, 1, 1));
        fx.image.fields.push(FieldRow {
            flags: FIELD_PUBLIC | FIELD_STATIC,
            name: pub_name,
            signature: 1,
        });
        fx.image.fields.push(FieldRow {
            flags: 0x0001, // private
            name: priv_name,
            signature: 1,
        });
        fx.image.blobs = crate::meta::heaps::BlobHeap::parse(&[0x00, 0x02, 0x06, 0x0E]);
        let image = fx.finish();

        let fields = image.fields_of(0);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "Visible");
        assert_eq!(fields[0].ty, "string");
    }

    #[test]
    fn generic_var_renders_declared_name() {
        let mut fx = Fixture::new();
        let ns = fx.intern("N");
        let ty = fx.intern("Box`1");
        let t_name = fx.intern("T");
        fx.image.type_defs.push(type_def(ty, ns, 1, 1));
        fx.image.generic_params.push(GenericParamRow {
            number: 0,
            owner: Coded {
                table: Some(TableId::TypeDef),
                row: 1,
            },
            name: t_name,
        });
        let image = fx.finish();

        let scope = Scope {
            type_idx: 0,
            method_idx: None,
        };
        assert_eq!(image.render_type(&TypeSig::Var(0), scope), "T");
        assert_eq!(image.render_type(&TypeSig::Var(3), scope), "!3");
    }
}
