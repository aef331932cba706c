//! OpenAPI documentation
//!
//! The document is projected from the same parameter registries that parse
//! requests, so it cannot drift from what the server accepts. It is built
//! once at startup with the `utoipa` builders.

use infrastructure::ApiConfig;
use serde_json::Value;
use tracing::warn;
use utoipa::openapi::external_docs::ExternalDocs;
use utoipa::openapi::info::{ContactBuilder, InfoBuilder};
use utoipa::openapi::path::{
    HttpMethod, OperationBuilder, Parameter, ParameterBuilder, ParameterIn, PathItem, PathsBuilder,
};
use utoipa::openapi::response::ResponseBuilder;
use utoipa::openapi::schema::{KnownFormat, ObjectBuilder, Schema, SchemaFormat, Type};
use utoipa::openapi::{OpenApi, OpenApiBuilder, RefOr, Required};

use crate::contract::{Fallback, ParameterRegistry, ParameterSpec, Parser, SchemaKind};
use crate::routes::{RouteDescriptor, RouteTable};

/// Media type of the served document
pub const OPENAPI_CONTENT_TYPE: &str = "application/vnd.oai.openapi;version=3.1.0";

/// Well-known location of the document
pub const SERVICE_DESC_PATH: &str = "/.well-known/service-desc";

fn schema(kind: SchemaKind) -> ObjectBuilder {
    let builder = ObjectBuilder::new();
    match kind {
        SchemaKind::String => builder.schema_type(Type::String),
        SchemaKind::Integer => builder.schema_type(Type::Integer),
        SchemaKind::Number => builder.schema_type(Type::Number),
        SchemaKind::Boolean => builder.schema_type(Type::Boolean),
        SchemaKind::DateTime => builder
            .schema_type(Type::String)
            .format(Some(SchemaFormat::KnownFormat(KnownFormat::DateTime))),
    }
}

fn parameter(
    name: &str,
    location: ParameterIn,
    description: String,
    required: bool,
    object: ObjectBuilder,
) -> Parameter {
    ParameterBuilder::new()
        .name(name)
        .parameter_in(location)
        .description(Some(description))
        .required(if required { Required::True } else { Required::False })
        .schema(Some(RefOr::T(Schema::Object(object.build()))))
        .build()
}

fn describe(spec: &ParameterSpec) -> String {
    match spec.fallback() {
        Fallback::Described(text) => format!("{} – Default: {text}", spec.description()),
        Fallback::Required | Fallback::Default(_) => spec.description().to_string(),
    }
}

/// Sub-keys of a location parameter in its coordinate form
fn location_parameters(name: &str) -> Vec<Parameter> {
    [
        ("latitude", SchemaKind::Number, "Latitude"),
        ("longitude", SchemaKind::Number, "Longitude"),
        ("name", SchemaKind::String, "Name"),
        ("id", SchemaKind::String, "POI ID, takes precedence over the address"),
        ("address", SchemaKind::String, "Address"),
    ]
    .into_iter()
    .map(|(suffix, kind, text)| {
        parameter(
            &format!("{name}.{suffix}"),
            ParameterIn::Query,
            format!("{text} of `{name}`, if it is not a stop/station."),
            false,
            schema(kind),
        )
    })
    .collect()
}

/// OpenAPI parameters for every visible entry of `registry`
///
/// Date/time parameters become `string`/`date-time`, enum values and
/// machine defaults are carried over, and prose defaults are appended to the
/// description. Location parameters also document their coordinate form.
#[must_use]
pub fn project(registry: &ParameterRegistry, location: ParameterIn) -> Vec<Parameter> {
    let mut parameters = Vec::new();
    for spec in registry.iter().filter(|s| s.is_visible()) {
        let mut object = schema(spec.parser().kind());
        if let Some(values) = spec.parser().allowed_values() {
            object = object.enum_values(Some(values.iter().map(String::as_str)));
        }
        if let Some(default) = spec.default_value() {
            object = object.default(Some(default.to_json()));
        }

        if let Parser::Location { .. } = spec.parser() {
            // either form satisfies the parameter, so no single key is required
            parameters.push(parameter(
                spec.name(),
                location.clone(),
                describe(spec),
                false,
                object,
            ));
            parameters.extend(location_parameters(spec.name()));
        } else {
            parameters.push(parameter(
                spec.name(),
                location.clone(),
                describe(spec),
                spec.is_required(),
                object,
            ));
        }
    }
    parameters
}

fn path_item(route: &RouteDescriptor) -> Option<PathItem> {
    let doc = route.doc.as_ref()?;
    let mut parameters = project(&route.path_params, ParameterIn::Path);
    parameters.extend(project(&route.query_params, ParameterIn::Query));

    let response = |text: &str| RefOr::T(ResponseBuilder::new().description(text).build());
    let operation = OperationBuilder::new()
        .operation_id(Some(route.name.clone()))
        .summary(Some(doc.summary.clone()))
        .description(Some(doc.description.clone()))
        .parameters(Some(parameters))
        .response("2XX", response("Success."))
        .response("4XX", response("Invalid request parameters."))
        .response("5XX", response("The upstream data source failed."));
    Some(PathItem::new(HttpMethod::Get, operation.build()))
}

/// Aggregate every documented route into one document
///
/// Routes without documentation are skipped with a warning.
#[must_use]
pub fn build_document(routes: &RouteTable, api: &ApiConfig) -> OpenApi {
    let mut paths = PathsBuilder::new();
    for route in routes {
        match path_item(route) {
            Some(item) => paths = paths.path(route.path.clone(), item),
            None => warn!(route = %route.name, "Route has no documentation, leaving it out"),
        }
    }

    let contact = api
        .homepage
        .as_ref()
        .map(|url| ContactBuilder::new().url(Some(url.clone())).build());
    let info = InfoBuilder::new()
        .title(api.name.clone())
        .version(
            api.version
                .clone()
                .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
        )
        .description(api.description.clone())
        .contact(contact)
        .build();

    let external_docs = api.docs_link.as_ref().map(|url| {
        let mut docs = ExternalDocs::new(url.clone());
        docs.description = Some("API documentation".to_string());
        docs
    });

    OpenApiBuilder::new()
        .info(info)
        .paths(paths.build())
        .external_docs(external_docs)
        .build()
}

/// The document as JSON
#[must_use]
pub fn to_value(document: &OpenApi) -> Value {
    serde_json::to_value(document).unwrap_or(Value::Null)
}
