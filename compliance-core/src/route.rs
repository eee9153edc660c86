//! Client-side route table. The router in `compliance-ui` mounts one view per
//! pattern and sends `ROOT` to `COMPANIES`; anything else is not found.

pub const ROOT: &str = "/";
pub const COMPANIES: &str = "/companies";
pub const COMPANY_DETAIL: &str = "/companies/:id";

pub fn company_detail_path(id: impl std::fmt::Display) -> String {
    format!("{COMPANIES}/{id}")
}
