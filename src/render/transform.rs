use crate::model::Transform;
use crate::render::esc;

/// Working directory the local transform host defaults to.
pub const DEFAULT_WORKING_DIR: &str = "/usr/share/maltego/bin";

/// `<id>.transformsettings`: the command line actually invoked.
pub fn render_transform_settings(trx: &Transform) -> String {
    format!(
        concat!(
            r#"<TransformSettings enabled="true" disclaimerAccepted="false" showHelp="true" runWithAll="true" favorite="false">"#,
            "<Properties>",
            r#"<Property name="transform.local.command" type="string" popup="false">{command}</Property>"#,
            r#"<Property name="transform.local.parameters" type="string" popup="false">{parameters}</Property>"#,
            r#"<Property name="transform.local.working-directory" type="string" popup="false"/>"#,
            r#"<Property name="transform.local.debug" type="boolean" popup="false">false</Property>"#,
            "</Properties>",
            "</TransformSettings>",
        ),
        command = esc(&trx.command),
        parameters = esc(&trx.parameters),
    )
}

/// `<id>.transform`: parameter schema, input constraint and metadata.
pub fn render_transform_descriptor(trx: &Transform) -> String {
    format!(
        concat!(
            r#"<MaltegoTransform name="{id}" displayName="{display}" abstract="false" template="false" visibility="public" description="{desc}" author="{author}" requireDisplayInfo="false">"#,
            "<TransformAdapter>com.paterva.maltego.transform.protocol.v2api.LocalTransformAdapterV2</TransformAdapter>",
            "<Properties>",
            "<Fields>",
            r#"<Property name="transform.local.command" type="string" nullable="false" hidden="false" readonly="false" description="The command to execute for this transform" popup="false" abstract="false" visibility="public" auth="false" displayName="Command line">"#,
            "<SampleValue></SampleValue>",
            "</Property>",
            r#"<Property name="transform.local.parameters" type="string" nullable="true" hidden="false" readonly="false" description="The parameters to pass to the transform command" popup="false" abstract="false" visibility="public" auth="false" displayName="Command parameters">"#,
            "<SampleValue></SampleValue>",
            "</Property>",
            r#"<Property name="transform.local.working-directory" type="string" nullable="true" hidden="false" readonly="false" description="The working directory used when invoking the executable" popup="false" abstract="false" visibility="public" auth="false" displayName="Working directory">"#,
            "<DefaultValue>{workdir}</DefaultValue>",
            "<SampleValue></SampleValue>",
            "</Property>",
            r#"<Property name="transform.local.debug" type="boolean" nullable="true" hidden="false" readonly="false" description="When this is set, the transform&apos;s text output will be printed to the output window" popup="false" abstract="false" visibility="public" auth="false" displayName="Show debug info">"#,
            "<SampleValue>false</SampleValue>",
            "</Property>",
            "</Fields>",
            "</Properties>",
            "<InputConstraints>",
            r#"<Entity type="{input}" min="1" max="1"/>"#,
            "</InputConstraints>",
            "<OutputEntities/>",
            "<StealthLevel>0</StealthLevel>",
            "</MaltegoTransform>",
        ),
        id = esc(&trx.id),
        display = esc(&trx.display),
        desc = esc(&trx.desc),
        author = esc(&trx.author),
        workdir = DEFAULT_WORKING_DIR,
        input = esc(&trx.input),
    )
}
