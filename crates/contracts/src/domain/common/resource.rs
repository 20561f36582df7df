use serde::{de::DeserializeOwned, Serialize};

/// A backend resource
///
/// Every resource exposes the same REST contract under its collection path
/// (`/spiders`, `/tasks`, ...): list, get-by-id, create, update, delete and
/// the `/batch` variants.
pub trait Resource:
    Clone + Default + PartialEq + Serialize + DeserializeOwned + std::fmt::Debug + 'static
{
    /// Identifier of the stored record, `None` for a form that was never saved
    fn id(&self) -> Option<&str>;

    /// Display name used in tabs and tables
    fn display_name(&self) -> &str;

    /// Index of the resource in the system (e.g. "a001")
    fn resource_index() -> &'static str;

    /// Collection segment of the REST path (e.g. "spiders")
    fn collection_name() -> &'static str;

    /// UI name of one element (singular)
    fn element_name() -> &'static str;

    /// UI name of the list (plural)
    fn list_name() -> &'static str;

    /// REST endpoint relative to the API base (e.g. "/spiders")
    fn endpoint() -> String {
        format!("/{}", Self::collection_name())
    }

    /// Full resource name (e.g. "a001_spider"); also used as the tab key
    fn full_name() -> String {
        format!("{}_{}", Self::resource_index(), Self::element_key())
    }

    /// Singular key segment used in tab keys
    fn element_key() -> &'static str;
}
