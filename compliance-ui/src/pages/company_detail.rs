use compliance_core::detail::{load_dashboard, update_obligation_status, DetailState, Phase};
use compliance_core::dto::{Dashboard, Obligation};
use compliance_core::route;
use leptos::*;
use leptos_router::{use_navigate, use_params_map, NavigateOptions};
use wasm_bindgen_futures::spawn_local;

use crate::bridge::{Client, SignalStore};

#[component]
pub fn CompanyDetail() -> impl IntoView {
    let client = expect_context::<Client>();
    let params = use_params_map();
    let company_id = create_memo(move |_| params.with(|p| p.get("id").cloned().unwrap_or_default()));
    let state = SignalStore(create_rw_signal(DetailState::default()));

    {
        let client = client.clone();
        create_effect(move |_| {
            let id = company_id.get();
            let client = client.clone();
            spawn_local(async move {
                load_dashboard(&client, &state, &id).await;
            });
        });
    }
    on_cleanup(move || state.update_quietly(DetailState::cancel));

    let toggle = Callback::new(move |(obligation_id, is_compliant): (i64, bool)| {
        let client = client.clone();
        let id = company_id.get_untracked();
        spawn_local(async move {
            update_obligation_status(&client, &state, &id, obligation_id, is_compliant).await;
        });
    });

    let score = create_memo(move |_| state.0.with(DetailState::score_label));
    let stats = move || {
        state.0.with(|s| {
            s.dashboard
                .as_ref()
                .map(Dashboard::stats_or_default)
                .unwrap_or_default()
        })
    };
    let todo = Signal::derive(move || state.0.with(|s| s.todo().to_vec()));
    let completed = Signal::derive(move || state.0.with(|s| s.completed().to_vec()));
    let busy = Signal::derive(move || state.0.with(|s| s.busy));

    let navigate = use_navigate();

    view! {
      <div class="page">
        <button type="button" on:click=move |_| navigate(route::COMPANIES, NavigateOptions::default())>
          "← Listeye dön"
        </button>

        <h1>"Şirket Detay"</h1>

        <Show when=move || state.0.with(|s| s.error.is_some()) fallback=|| ()>
          <p class="error">
            {move || format!("Hata: {}", state.0.with(|s| s.error.clone().unwrap_or_default()))}
          </p>
        </Show>
        <Show when=move || state.0.with(|s| s.loading) fallback=|| ()>
          <p>"Yükleniyor..."</p>
        </Show>

        <Show when=move || state.0.with(|s| s.phase() == Phase::Loaded) fallback=|| ()>
          <h2>
            {move || state.0.with(|s| s.dashboard.as_ref().map(Dashboard::heading).unwrap_or_default())}
          </h2>
          <p>"Skor: " <b>{move || score.get()}</b></p>

          <h3>"İstatistik"</h3>
          <ul>
            <li>{move || format!("Total: {}", stats().total_label())}</li>
            <li>{move || format!("Açık: {}", stats().open_label())}</li>
            <li>{move || format!("Gecikmiş: {}", stats().overdue_label())}</li>
          </ul>

          <h3>"Yapılacaklar"</h3>
          <ObligationList
            items=todo
            busy=busy
            action="Tamamlandı"
            empty="Todo yok"
            mark_compliant=true
            on_toggle=toggle
          />

          <h3>"Tamamlananlar"</h3>
          <ObligationList
            items=completed
            busy=busy
            action="Geri al"
            empty="Henüz tamamlanan yok"
            mark_compliant=false
            on_toggle=toggle
          />
        </Show>
      </div>
    }
}

/// One obligation section. Each row toggles to `mark_compliant`.
#[component]
fn ObligationList(
    #[prop(into)] items: Signal<Vec<Obligation>>,
    #[prop(into)] busy: Signal<Option<i64>>,
    action: &'static str,
    empty: &'static str,
    mark_compliant: bool,
    on_toggle: Callback<(i64, bool)>,
) -> impl IntoView {
    view! {
      <Show when=move || !items.with(Vec::is_empty) fallback=move || view! { <p>{empty}</p> }>
        <ul class="obligations">
          <For
            each=move || items.get()
            key=|o| o.obligation_id
            children=move |o| {
              let id = o.obligation_id;
              let is_busy = move || busy.get() == Some(id);
              view! {
                <li>
                  <div><b>{o.regulation_title.clone()}</b></div>
                  <div class="meta">{o.detail_line()}</div>
                  <button
                    type="button"
                    prop:disabled=is_busy
                    on:click=move |_| on_toggle.call((id, mark_compliant))
                  >
                    {move || if is_busy() { "İşleniyor..." } else { action }}
                  </button>
                </li>
              }
            }
          />
        </ul>
      </Show>
    }
}
