//! Aggregate "icon pack" object listing every icon of a batch

use crate::format;
use crate::ident::IdentifierTable;
use crate::writer::CodeWriter;

/// Render `object <pack_name>` with one accessor per icon plus `All`, `Count` and
/// `getByName`.
///
/// Accessors use the batch-unique names from `table` and point at each icon's fully
/// qualified property.
pub fn emit_icon_pack(table: &IdentifierTable, base_package: &str, pack_name: &str) -> String {
    let mut w = CodeWriter::new();

    w.line("// Auto-generated by iconforge - DO NOT EDIT");
    w.blank();
    if !base_package.is_empty() {
        w.line(format!("package {base_package}"));
        w.blank();
    }
    w.line("import androidx.compose.ui.graphics.vector.ImageVector");
    w.blank();
    w.line("/**");
    w.line(format!(" * Icon pack containing all {} converted icons.", table.len()));
    w.line(" */");
    w.open(format!("object {pack_name} {{"));

    for (name, entry) in table.iter() {
        let target = format!("{}.{}", entry.namespace.package(base_package), entry.identifier);
        let target = target.trim_start_matches('.');
        w.line(format!("val {name}: ImageVector get() = {target}"));
    }
    if !table.is_empty() {
        w.blank();
    }

    w.line("/** All icons in this pack. */");
    if table.is_empty() {
        w.line("val All: List<ImageVector> by lazy { emptyList() }");
    } else {
        w.open("val All: List<ImageVector> by lazy {");
        w.open("listOf(");
        let names: Vec<&str> = table.iter().map(|(name, _)| name).collect();
        let last = names.len() - 1;
        for (i, name) in names.iter().enumerate() {
            w.line(if i == last { name.to_string() } else { format!("{name},") });
        }
        w.close(")");
        w.close("}");
    }
    w.blank();

    w.line("/** Number of icons in this pack. */");
    w.line(format!("const val Count: Int = {}", table.len()));
    w.blank();

    w.line("/** Look up an icon by its accessor name. */");
    w.open("fun getByName(name: String): ImageVector? = when (name) {");
    for (name, _) in table.iter() {
        w.line(format!("{} -> {name}", format::string(name)));
    }
    w.line("else -> null");
    w.close("}");

    w.close("}");
    w.finish()
}
