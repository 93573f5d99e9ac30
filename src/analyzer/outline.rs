use serde::{Deserialize, Serialize};
use swc_common::{sync::Lrc, FileName, SourceMap, Span};
use swc_ecma_ast::*;
use swc_ecma_parser::{EsConfig, Parser, StringInput, Syntax, TsConfig};
use swc_ecma_visit::{Visit, VisitWith};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExportKind {
    Named,
    Default,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportInfo {
    pub name: String,
    pub kind: ExportKind,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportMeta {
    pub source: String,
    pub specifiers: Vec<String>,
    pub line: usize,
}

/// What a downloaded component file declares and pulls in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceOutline {
    pub imports: Vec<ImportMeta>,
    pub exports: Vec<ExportInfo>,
    /// Capitalized function / arrow declarations, i.e. React components.
    pub components: Vec<String>,
}

struct OutlineVisitor {
    cm: Lrc<SourceMap>,
    outline: SourceOutline,
}

impl OutlineVisitor {
    fn line(&self, span: Span) -> usize {
        self.cm.lookup_char_pos(span.lo).line
    }

    fn add_component(&mut self, name: &str) {
        let is_component = name.chars().next().map(|c| c.is_uppercase()).unwrap_or(false);
        if is_component && !self.outline.components.iter().any(|c| c == name) {
            self.outline.components.push(name.to_string());
        }
    }

    fn add_export(&mut self, name: String, kind: ExportKind, span: Span) {
        let line = self.line(span);
        self.outline.exports.push(ExportInfo { name, kind, line });
    }
}

fn module_export_name(name: &ModuleExportName) -> String {
    match name {
        ModuleExportName::Ident(i) => i.sym.to_string(),
        ModuleExportName::Str(s) => s.value.to_string(),
    }
}

fn import_specifier_name(s: &ImportSpecifier) -> String {
    match s {
        ImportSpecifier::Named(n) => n.local.sym.to_string(),
        ImportSpecifier::Default(d) => d.local.sym.to_string(),
        ImportSpecifier::Namespace(ns) => format!("* as {}", ns.local.sym),
    }
}

impl Visit for OutlineVisitor {
    fn visit_fn_decl(&mut self, func: &FnDecl) {
        let name = func.ident.sym.to_string();
        self.add_component(&name);
        func.visit_children_with(self);
    }

    fn visit_var_declarator(&mut self, d: &VarDeclarator) {
        if let (Some(binding), Some(init)) = (d.name.as_ident(), &d.init) {
            if matches!(&**init, Expr::Arrow(_) | Expr::Fn(_)) {
                let name = binding.id.sym.to_string();
                self.add_component(&name);
            }
        }
        d.visit_children_with(self);
    }

    fn visit_import_decl(&mut self, import: &ImportDecl) {
        let line = self.line(import.span);
        self.outline.imports.push(ImportMeta {
            source: import.src.value.to_string(),
            specifiers: import.specifiers.iter().map(import_specifier_name).collect(),
            line,
        });
    }

    fn visit_export_decl(&mut self, export: &ExportDecl) {
        match &export.decl {
            Decl::Fn(func) => {
                self.add_export(func.ident.sym.to_string(), ExportKind::Named, export.span)
            }
            Decl::Class(class) => {
                self.add_export(class.ident.sym.to_string(), ExportKind::Named, export.span)
            }
            Decl::Var(v) => {
                for d in &v.decls {
                    if let Some(binding) = d.name.as_ident() {
                        self.add_export(binding.id.sym.to_string(), ExportKind::Named, export.span);
                    }
                }
            }
            _ => {}
        }
        export.visit_children_with(self);
    }

    fn visit_named_export(&mut self, export: &NamedExport) {
        for spec in &export.specifiers {
            if let ExportSpecifier::Named(named) = spec {
                let exported = named.exported.as_ref().unwrap_or(&named.orig);
                let name = module_export_name(exported);
                let kind = if name == "default" { ExportKind::Default } else { ExportKind::Named };
                self.add_export(name, kind, export.span);
            }
        }
    }

    fn visit_export_default_decl(&mut self, export: &ExportDefaultDecl) {
        self.add_export("default".into(), ExportKind::Default, export.span);
        if let DefaultDecl::Fn(FnExpr { ident: Some(ident), .. }) = &export.decl {
            let name = ident.sym.to_string();
            self.add_component(&name);
        }
        export.visit_children_with(self);
    }

    fn visit_export_default_expr(&mut self, export: &ExportDefaultExpr) {
        self.add_export("default".into(), ExportKind::Default, export.span);
        export.visit_children_with(self);
    }
}

fn syntax_for(filename: &str) -> Syntax {
    let is_ts = filename.ends_with(".ts") || filename.ends_with(".tsx");
    if is_ts {
        Syntax::Typescript(TsConfig {
            tsx: filename.ends_with(".tsx"),
            decorators: true,
            dts: filename.ends_with(".d.ts"),
            no_early_errors: true,
            ..Default::default()
        })
    } else {
        Syntax::Es(EsConfig {
            jsx: true,
            decorators: true,
            ..Default::default()
        })
    }
}

/// Outline a component source file. Returns `None` when SWC cannot parse it.
pub fn outline_source(source: &str, filename: &str) -> Option<SourceOutline> {
    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(Lrc::new(FileName::Custom(filename.to_string())), source.into());
    let mut parser = Parser::new(syntax_for(filename), StringInput::from(&*fm), None);

    let module = match parser.parse_module() {
        Ok(m) => m,
        Err(err) => {
            tracing::debug!(filename, kind = ?err.kind(), "component source did not parse");
            return None;
        }
    };

    let mut visitor = OutlineVisitor { cm, outline: SourceOutline::default() };
    module.visit_with(&mut visitor);
    Some(visitor.outline)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUTTON: &str = r#"import { motion } from "framer-motion"
import { addPropertyControls, ControlType } from "framer"

export function Label(props) {
    return <span>{props.text}</span>
}

const Inner = () => <div />

export default function Button(props) {
    return <motion.button><Inner /></motion.button>
}
"#;

    #[test]
    fn outlines_imports_exports_and_components() {
        let outline = outline_source(BUTTON, "Button.tsx").expect("parses");

        let sources: Vec<&str> = outline.imports.iter().map(|i| i.source.as_str()).collect();
        assert_eq!(sources, vec!["framer-motion", "framer"]);
        assert_eq!(outline.imports[1].specifiers, vec!["addPropertyControls", "ControlType"]);
        assert_eq!(outline.imports[0].line, 1);

        assert!(outline.exports.iter().any(|e| e.name == "Label" && e.kind == ExportKind::Named));
        assert!(outline.exports.iter().any(|e| e.kind == ExportKind::Default));

        assert!(outline.components.contains(&"Label".to_string()));
        assert!(outline.components.contains(&"Inner".to_string()));
        assert!(outline.components.contains(&"Button".to_string()));
    }

    #[test]
    fn unparsable_source_yields_none() {
        assert!(outline_source("export default function (", "Broken.tsx").is_none());
    }
}
