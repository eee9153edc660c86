use compliance_core::route;
use leptos::*;
use leptos_router::*;

use crate::bridge;
use crate::pages::{CompaniesList, CompanyDetail, NotFound};

#[component]
pub fn App() -> impl IntoView {
    provide_context(bridge::client());

    view! {
      <Router>
        <main>
          <Routes>
            <Route path=route::ROOT view=|| view! { <Redirect path=route::COMPANIES/> }/>
            <Route path=route::COMPANIES view=CompaniesList/>
            <Route path=route::COMPANY_DETAIL view=CompanyDetail/>
            <Route path="/*any" view=NotFound/>
          </Routes>
        </main>
      </Router>
    }
}
