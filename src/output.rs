use crate::error::{ErrorKind, Result};
use appdata_pool::{AttrValue, Pool, RecordView};
use exn::ResultExt;
use std::io::Write;

/// Resolved views of every live record.
pub fn views(pool: &Pool) -> Result<Vec<RecordView>> {
    pool.records().map(|id| pool.view(id).or_raise(|| ErrorKind::Output)).collect()
}

pub fn write_json(out: &mut impl Write, views: &[RecordView]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, views).or_raise(|| ErrorKind::Output)?;
    writeln!(out).or_raise(|| ErrorKind::Output)
}

/// One block per record:
///
/// ```text
/// #0 application:Foo (noarch)
///   summary: Does foo
///   requires: appdata(foo.appdata.xml)
/// ```
pub fn write_text(out: &mut impl Write, views: &[RecordView]) -> Result<()> {
    for view in views {
        write_record(out, view).or_raise(|| ErrorKind::Output)?;
    }
    Ok(())
}

fn write_record(out: &mut impl Write, view: &RecordView) -> std::io::Result<()> {
    let name = view.name.as_deref().unwrap_or("<unnamed>");
    match view.arch.as_deref() {
        Some(arch) => writeln!(out, "{} {name} ({arch})", view.id)?,
        None => writeln!(out, "{} {name}", view.id)?,
    }
    if let Some(evr) = view.evr.as_deref().filter(|evr| !evr.is_empty()) {
        writeln!(out, "  evr: {evr}")?;
    }
    for (key, value) in &view.attributes {
        match value {
            AttrValue::Str(value) if value.contains('\n') => {
                writeln!(out, "  {key}:")?;
                for line in value.lines() {
                    writeln!(out, "    {line}")?;
                }
            },
            AttrValue::Str(value) => writeln!(out, "  {key}: {value}")?,
            AttrValue::Array(values) => writeln!(out, "  {key}: {}", values.join(", "))?,
        }
    }
    for relation in &view.requires {
        writeln!(out, "  requires: {relation}")?;
    }
    for relation in &view.provides {
        writeln!(out, "  provides: {relation}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use appdata_parse::{Flags, Ingestor};

    fn pool() -> Pool {
        let mut pool = Pool::new();
        let xml = "<component><id>foo.desktop</id><name>Foo</name><summary>Does foo</summary>\
            <description><p>One.</p><p>Two.</p></description></component>";
        Ingestor::new(Flags::empty()).ingest(&mut pool, xml.as_bytes()).unwrap();
        pool
    }

    #[test]
    fn test_write_text() {
        let pool = pool();
        let mut out = Vec::new();
        write_text(&mut out, &views(&pool).unwrap()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "#0 application:Foo (noarch)\n\
             \x20 category: desktop\n\
             \x20 description:\n\
             \x20   One.\n\
             \x20   \n\
             \x20   Two.\n\
             \x20 summary: Does foo\n\
             \x20 requires: appdata(foo.appdata.xml)\n\
             \x20 provides: application-appdata(foo.appdata.xml)\n\
             \x20 provides: application:Foo = \n"
        );
    }

    #[test]
    fn test_write_json() {
        let pool = pool();
        let mut out = Vec::new();
        write_json(&mut out, &views(&pool).unwrap()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["name"], "application:Foo");
        assert_eq!(value[0]["attributes"]["summary"], "Does foo");
        assert_eq!(value[0]["requires"][0], "appdata(foo.appdata.xml)");
    }
}
