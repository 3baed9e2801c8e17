//! Constants shared across the grid, the lookup client and the CLI.
//!
//! Wire-level strings (message types, filter names, envelope separators) live
//! here so the lookup module and the tests agree on a single spelling.

/// Separator between code and description in a dropdown label or value.
///
/// Options are rendered as `"P1 || Widget"`; selections arrive in the same form.
pub const OPTION_SEPARATOR: &str = " || ";

/// Cache key used when a dependent field has no driving value.
pub const ALL_OPTIONS_KEY: &str = "all";

/// Row index reserved for the uncommitted new row.
pub const NEW_ROW_SENTINEL: i64 = -1;

/// Filter name that scopes UN codes by product.
pub const PRODUCT_FILTER_NAME: &str = "Product";

/// Filter name that scopes DG classes by UN code.
pub const UN_CODE_FILTER_NAME: &str = "UNCode";

/// Default page size for option lookups when the config does not set one.
pub const DEFAULT_PAGE_LIMIT: u32 = 50;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV_VAR: &str = "CGRID_CONFIG";

/// Value stored in `ContainsHazardousGoods` when a DG class is present.
pub const HAZARDOUS_YES: &str = "Yes";

/// Value stored in `ContainsHazardousGoods` when no DG class is present.
pub const HAZARDOUS_NO: &str = "No";
