mod companies_list;
mod company_detail;

pub use companies_list::CompaniesList;
pub use company_detail::CompanyDetail;

use leptos::*;

#[component]
pub fn NotFound() -> impl IntoView {
    view! { <div class="page">"404"</div> }
}
