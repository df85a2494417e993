//! GraphQL document builders.
//!
//! Every query and mutation the crate sends is built here from an
//! [`EntityKind`], so the operation names, variable types and selection sets
//! stay consistent across entities.

mod order_by;

pub use order_by::{Direction, OrderBy};

use crate::models::EntityKind;

fn selection(kind: EntityKind, include_related: bool) -> String {
    match kind.related_selection() {
        Some(related) if include_related => format!("{} {}", kind.selection(), related),
        _ => kind.selection().to_string(),
    }
}

/// Collection query with `filter`, `first` and `orderBy` variables.
///
/// The response is `data.<plural>` with `totalCount`, `edges[].node` and
/// `pageInfo.hasNextPage`.
pub fn find_query(kind: EntityKind, include_related: bool) -> String {
    let type_name = kind.type_name();
    let plural = kind.plural();
    format!(
        "query Find{cap}($filter: {ty}FilterInput, $first: Int, $orderBy: [{ty}OrderByInput]) {{ \
         {plural}(filter: $filter, first: $first, orderBy: $orderBy) {{ \
         totalCount edges {{ node {{ {sel} }} }} pageInfo {{ hasNextPage }} }} }}",
        cap = capitalize(plural),
        ty = type_name,
        plural = plural,
        sel = selection(kind, include_related),
    )
}

/// Single-record query by id; the response is `data.<singular>`.
pub fn get_query(kind: EntityKind) -> String {
    let type_name = kind.type_name();
    format!(
        "query Get{ty}($filter: {ty}FilterInput) {{ {singular}(filter: $filter) {{ {sel} }} }}",
        ty = type_name,
        singular = kind.singular(),
        sel = selection(kind, false),
    )
}

/// `create<Type>(data:)`; the response is `data.create<Type>`.
pub fn create_mutation(kind: EntityKind) -> String {
    let type_name = kind.type_name();
    format!(
        "mutation Create{ty}($data: {ty}CreateInput!) {{ create{ty}(data: $data) {{ {sel} }} }}",
        ty = type_name,
        sel = selection(kind, false),
    )
}

/// `update<Type>(id:, data:)`; the response is `data.update<Type>`.
pub fn update_mutation(kind: EntityKind) -> String {
    let type_name = kind.type_name();
    format!(
        "mutation Update{ty}($id: UUID!, $data: {ty}UpdateInput!) {{ \
         update{ty}(id: $id, data: $data) {{ {sel} }} }}",
        ty = type_name,
        sel = selection(kind, false),
    )
}

/// `delete<Type>(id:)`; the response is `data.delete<Type>.id`.
pub fn delete_mutation(kind: EntityKind) -> String {
    let type_name = kind.type_name();
    format!(
        "mutation Delete{ty}($id: UUID!) {{ delete{ty}(id: $id) {{ id }} }}",
        ty = type_name,
    )
}

/// Field list of a named object type.
pub const TYPE_FIELDS_QUERY: &str =
    "query TypeFields($name: String!) { __type(name: $name) { name fields { name } } }";

/// Response key of a mutation (`createPerson`, `deleteNoteTarget`).
pub fn mutation_key(verb: &str, kind: EntityKind) -> String {
    format!("{}{}", verb, kind.type_name())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
