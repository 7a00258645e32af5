//! URI and content-type constants of the AASX container format.
//!
//! The `*_BROKEN` relationship types are the historical `www.` forms written
//! by older producers; the corrected forms drop the `www.` host prefix.

/// Relationship type of the aasx-origin part, corrected form.
pub const AASX_ORIGIN_TYPE: &str = "http://admin-shell.io/aasx/relationships/aasx-origin";
/// Relationship type of the aasx-origin part, historical broken form.
pub const AASX_ORIGIN_TYPE_BROKEN: &str =
    "http://www.admin-shell.io/aasx/relationships/aasx-origin";

/// Relationship type of an aas-spec part, corrected form.
pub const AAS_SPEC_TYPE: &str = "http://admin-shell.io/aasx/relationships/aas-spec";
/// Relationship type of an aas-spec part, historical broken form.
pub const AAS_SPEC_TYPE_BROKEN: &str = "http://www.admin-shell.io/aasx/relationships/aas-spec";

/// XML namespace of the current (version 3.0) AAS metamodel.
pub const AAS_NS_V3: &str = "https://admin-shell.io/aas/3/0";

/// Deprecated AAS namespaces: versions 1.0 and 2.0 under every URI scheme
/// variant that appears in the wild.
pub const AAS_NS_DEPRECATED: [&str; 6] = [
    "https://admin-shell.io/aas/1/0",
    "http://www.admin-shell.io/aas/1/0",
    "https://www.admin-shell.io/aas/1/0",
    "https://admin-shell.io/aas/2/0",
    "http://www.admin-shell.io/aas/2/0",
    "https://www.admin-shell.io/aas/2/0",
];

/// XML namespace of OPC relationship-definition documents (`*.rels`).
pub const OPC_RELATIONSHIPS_NS: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships";

/// XML namespace of the `[Content_Types].xml` stream.
pub const OPC_CONTENT_TYPES_NS: &str =
    "http://schemas.openxmlformats.org/package/2006/content-types";

/// Content type of relationship-definition parts.
pub const RELATIONSHIPS_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-package.relationships+xml";

/// Whether a part with this content type is eligible for the XML-level fixers.
pub fn is_xml_content_type(content_type: &str) -> bool {
    content_type == "text/xml" || content_type == "application/xml"
}
