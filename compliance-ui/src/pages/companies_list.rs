use compliance_core::filter::{parse_threshold, ListFilter, DEFAULT_THRESHOLD, MAX_THRESHOLD, SECTORS};
use compliance_core::list::{load_companies, ListState, Phase};
use compliance_core::route::company_detail_path;
use leptos::*;
use leptos_router::{use_navigate, NavigateOptions};
use wasm_bindgen_futures::spawn_local;

use crate::bridge::{Client, SignalStore};

#[component]
pub fn CompaniesList() -> impl IntoView {
    let client = expect_context::<Client>();
    let state = SignalStore(create_rw_signal(ListState::default()));

    let sector = create_rw_signal(String::new());
    let risky_only = create_rw_signal(false);
    let threshold = create_rw_signal(DEFAULT_THRESHOLD);

    let list_path = create_memo(move |_| {
        ListFilter {
            sector: sector.get(),
            risky_only: risky_only.get(),
            threshold: threshold.get(),
        }
        .list_path()
    });

    {
        let client = client.clone();
        create_effect(move |_| {
            let path = list_path.get();
            let client = client.clone();
            spawn_local(async move {
                load_companies(&client, &state, &path).await;
            });
        });
    }
    on_cleanup(move || state.update_quietly(ListState::cancel));

    let navigate = use_navigate();
    let open_detail = Callback::new(move |id: i64| navigate(&company_detail_path(id), NavigateOptions::default()));
    let open_report = Callback::new(move |id: i64| {
        let url = client.dashboard_page_url(id);
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.open_with_url_and_target(&url, "_blank") {
                tracing::warn!(%url, error = ?e, "could not open report window");
            }
        }
    });

    let clear_filters = move |_| {
        batch(|| {
            sector.set(String::new());
            risky_only.set(false);
            threshold.set(DEFAULT_THRESHOLD);
        })
    };

    view! {
      <div class="page">
        <h1>"Şirketler"</h1>

        <div class="filters">
          <label>
            "Sektör: "
            <select
              prop:value=move || sector.get()
              on:change=move |ev| sector.set(event_target_value(&ev))
            >
              {SECTORS
                .iter()
                .map(|(value, label)| view! { <option value=*value>{*label}</option> })
                .collect_view()}
            </select>
          </label>

          <label class="check">
            <input
              type="checkbox"
              prop:checked=move || risky_only.get()
              on:change=move |ev| risky_only.set(event_target_checked(&ev))
            />
            {move || format!("Sadece riskli (skor < {})", threshold.get())}
          </label>

          <label>
            "Eşik: "
            <input
              type="number"
              min="0"
              max=MAX_THRESHOLD.to_string()
              prop:value=move || threshold.get().to_string()
              prop:disabled=move || !risky_only.get()
              on:input=move |ev| threshold.set(parse_threshold(&event_target_value(&ev)))
            />
          </label>

          <button type="button" on:click=clear_filters>"Filtreyi temizle"</button>
        </div>

        <Show when=move || state.0.with(|s| s.error.is_some()) fallback=|| ()>
          <p class="error">
            {move || format!("Hata: {}", state.0.with(|s| s.error.clone().unwrap_or_default()))}
          </p>
        </Show>
        <Show when=move || state.0.with(|s| s.loading) fallback=|| ()>
          <p>"Yükleniyor..."</p>
        </Show>

        <Show when=move || state.0.with(|s| s.phase() == Phase::Ready) fallback=|| ()>
          <table class="companies">
            <thead>
              <tr>
                <th>"Şirket"</th>
                <th>"Skor"</th>
                <th class="actions">"İşlemler"</th>
              </tr>
            </thead>
            <tbody>
              <For
                each=move || state.0.with(|s| s.companies.clone())
                key=|c| c.id
                children=move |c| {
                  let id = c.id;
                  view! {
                    <tr on:click=move |_| open_detail.call(id)>
                      <td>
                        <div class="name">{c.name.clone()}</div>
                        <div class="meta">{format!("ID: {id}")}</div>
                      </td>
                      <td>{c.score_label()}</td>
                      <td class="actions">
                        <button
                          type="button"
                          on:click=move |ev| {
                            ev.stop_propagation();
                            open_report.call(id);
                          }
                        >
                          "HTML Paneli"
                        </button>
                      </td>
                    </tr>
                  }
                }
              />
            </tbody>
          </table>
        </Show>
      </div>
    }
}
