use crate::meta::{Image, MethodInfo};

/// Everything the report prints for one resolved type.
#[derive(Debug, Clone)]
pub struct TypeReport {
    pub module: String,
    pub type_name: String,
    pub interfaces: Vec<String>,
    pub fields: Vec<String>,
    pub properties: Vec<String>,
    pub methods: Vec<MethodInfo>,
}

/// Collect the report for the TypeDef at `idx`.
pub fn build(image: &Image, idx: usize) -> TypeReport {
    TypeReport {
        module: image.identity(),
        type_name: image.type_full_name(idx),
        interfaces: image.interfaces_of(idx),
        fields: image
            .fields_of(idx)
            .into_iter()
            .map(|f| format!("{} {}", f.ty, f.name))
            .collect(),
        properties: image
            .properties_of(idx)
            .into_iter()
            .filter(|p| p.public_type)
            .map(|p| format!("{} {}", p.ty, p.name))
            .collect(),
        methods: image.methods_of(idx),
    }
}

/// Render the report in its fixed four-section layout.
pub fn format(report: &TypeReport) -> String {
    let mut out = String::new();
    out.push_str(&report.module);
    out.push('\n');
    out.push_str(&report.type_name);
    out.push('\n');

    section(&mut out, "implements interfaces", &report.interfaces);
    section(&mut out, "fields", &report.fields);
    section(&mut out, "properties", &report.properties);

    out.push_str("=== methods ===\n");
    for m in &report.methods {
        out.push_str("  ");
        if m.is_static {
            out.push_str("[static] ");
        }
        if m.is_final {
            out.push_str("[final] ");
        }
        if m.is_abstract {
            out.push_str("[abstract] ");
        }
        out.push_str(&method_signature(m));
        out.push('\n');
    }
    out
}

fn section(out: &mut String, header: &str, entries: &[String]) {
    out.push_str("=== ");
    out.push_str(header);
    out.push_str(" ===\n");
    for entry in entries {
        out.push_str("  ");
        out.push_str(entry);
        out.push('\n');
    }
}

fn method_signature(m: &MethodInfo) -> String {
    format!("{} {}({})", m.ret, m.name, m.params.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(name: &str) -> MethodInfo {
        MethodInfo {
            name: name.to_string(),
            is_static: false,
            is_final: false,
            is_abstract: false,
            ret: "void".to_string(),
            params: Vec::new(),
        }
    }

    fn empty_report() -> TypeReport {
        TypeReport {
            module: "Widgets, Version=1.0.0.0, Culture=neutral, PublicKeyToken=null".to_string(),
            type_name: "Widgets.Gadget".to_string(),
            interfaces: Vec::new(),
            fields: Vec::new(),
            properties: Vec::new(),
            methods: Vec::new(),
        }
    }

    #[test]
    fn empty_sections_keep_their_headers() {
        let out = format(&empty_report());
        assert_eq!(
            out,
            "Widgets, Version=1.0.0.0, Culture=neutral, PublicKeyToken=null\n\
             Widgets.Gadget\n\
             === implements interfaces ===\n\
             === fields ===\n\
             === properties ===\n\
             === methods ===\n"
        );
    }

    #[test]
    fn entries_are_indented_under_their_section() {
        let mut report = empty_report();
        report.interfaces.push("System.IDisposable".to_string());
        report.fields.push("int Count".to_string());
        let out = format(&report);
        assert!(out.contains("=== implements interfaces ===\n  System.IDisposable\n"));
        assert!(out.contains("=== fields ===\n  int Count\n"));
    }

    #[test]
    fn method_markers_prefix_the_signature() {
        let mut report = empty_report();
        let mut stat = method("Create");
        stat.is_static = true;
        stat.ret = "Widgets.Gadget".to_string();
        let mut sealed = method("Dispose");
        sealed.is_final = true;
        let mut abs = method("Render");
        abs.is_abstract = true;
        abs.params = vec!["int depth".to_string(), "bool wire".to_string()];
        report.methods = vec![stat, sealed, abs, method("Reset")];

        let out = format(&report);
        assert!(out.contains("  [static] Widgets.Gadget Create()\n"));
        assert!(out.contains("  [final] void Dispose()\n"));
        assert!(out.contains("  [abstract] void Render(int depth, bool wire)\n"));
        assert!(out.contains("  void Reset()\n"));
    }
}
