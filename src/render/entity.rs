use crate::config::{EntitySpec, FieldSpec};
use crate::render::{esc, flag};
use std::fmt::Write;

/// `Entities/<id>.entity`.
///
/// The same icon fills the small and large slots; the plural display name is
/// the singular with an `s` appended.
pub fn render_entity(id: &str, entity: &EntitySpec) -> String {
    let display = entity.display.as_deref().unwrap_or(id);

    let mut xml = format!(
        concat!(
            r#"<MaltegoEntity id="{id}" displayName="{display}" displayNamePlural="{display}s" "#,
            r#"description="{desc}" category="{category}" smallIconResource="{icon}" largeIconResource="{icon}" "#,
            r#"allowedRoot="true" conversionOrder="2147483647" visible="true">"#,
        ),
        id = esc(id),
        display = esc(display),
        desc = esc(&entity.desc),
        category = esc(&entity.category),
        icon = esc(&entity.icon),
    );

    if let Some(parent) = &entity.parent {
        let _ = write!(
            xml,
            "<BaseEntities><BaseEntity>{}</BaseEntity></BaseEntities>",
            esc(parent)
        );
    }

    xml.push_str("<Properties");
    if let Some(v) = &entity.display_value {
        let _ = write!(xml, r#" displayValue="properties.{}""#, esc(v));
    }
    if let Some(v) = &entity.edit_value {
        let _ = write!(xml, r#" value="properties.{}""#, esc(v));
    }
    xml.push_str("><Groups/>");

    if entity.properties.is_empty() {
        xml.push_str("<Fields/>");
    } else {
        xml.push_str("<Fields>");
        for (name, field) in &entity.properties {
            render_field(&mut xml, name, field);
        }
        xml.push_str("</Fields>");
    }

    xml.push_str("</Properties></MaltegoEntity>");
    xml
}

fn render_field(xml: &mut String, name: &str, field: &FieldSpec) {
    let _ = write!(
        xml,
        r#"<Field nullable="{}" hidden="{}" readonly="{}" name="properties.{}" type="{}" description="{}" displayName="{}""#,
        flag(field.nullable),
        flag(field.hidden),
        flag(field.readonly),
        esc(name),
        esc(&field.field_type),
        esc(&field.desc),
        esc(field.display.as_deref().unwrap_or(name)),
    );
    if let Some(evaluator) = field.effective_evaluator() {
        let _ = write!(xml, r#" evaluator="{}""#, esc(evaluator));
    }
    let _ = write!(xml, "><SampleValue>{}</SampleValue>", esc(&field.sample));
    if let Some(default) = &field.default {
        let _ = write!(xml, "<DefaultValue>{}</DefaultValue>", esc(default));
    }
    xml.push_str("</Field>");
}
