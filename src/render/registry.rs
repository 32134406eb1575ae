//! Transform sets, the local server registry and entity categories.

use crate::model::{EntityCategory, TransformSet};
use crate::render::esc;
use std::fmt::Write;

/// `TransformSets/<name>.set`.
pub fn render_transform_set(set: &TransformSet) -> String {
    let mut xml = format!(
        r#"<TransformSet name="{}" description="{}"><Transforms>"#,
        esc(&set.name),
        esc(&set.description)
    );
    for id in &set.members {
        let _ = write!(xml, r#"<Transform name="{}"/>"#, esc(id));
    }
    xml.push_str("</Transforms></TransformSet>");
    xml
}

/// `Servers/Local.tas`: the one local server, listing every transform id.
///
/// `last_sync` is the only time-varying part of the package.
pub fn render_server_registry<'a>(
    transform_ids: impl IntoIterator<Item = &'a str>,
    last_sync: &str,
) -> String {
    let transforms = transform_ids
        .into_iter()
        .map(|id| format!(r#"<Transform name="{}"/>"#, esc(id)))
        .collect::<Vec<_>>()
        .join("\n      ");

    format!(
        r#"<MaltegoServer name="Local" enabled="true" description="Local transforms hosted on this machine" url="http://localhost">
   <LastSync>{last_sync}</LastSync>
   <Protocol version="0.0"/>
   <Authentication type="none"/>
   <Transforms>
      {transforms}
   </Transforms>
   <Seeds/>
</MaltegoServer>"#,
        last_sync = esc(last_sync),
    )
}

/// `EntityCategories/<name>.category`.
pub fn render_entity_category(category: &EntityCategory) -> String {
    format!(r#"<EntityCategory name="{}"/>"#, esc(&category.name))
}
