use countymap_shared::scale;
use leptos::prelude::*;

use crate::app::ShowLegend;
use crate::format::format_count;

/// Human-readable range for one population band.
pub fn band_label(index: usize) -> String {
    match scale::band_range(index) {
        (None, Some(hi)) => format!("< {}", format_count(hi)),
        (Some(lo), Some(hi)) => format!("{} - {}", format_count(lo), format_count(hi)),
        (Some(lo), None) => format!("> {}", format_count(lo)),
        (None, None) => String::new(),
    }
}

/// Color key for the population choropleth, bottom-right of the map.
#[component]
pub fn Legend() -> impl IntoView {
    let ShowLegend(show_legend) = expect_context();

    view! {
        {move || {
            if !show_legend.get() {
                return view! {
                    <button
                        title="Show legend"
                        style="position: absolute; bottom: 12px; right: 12px; z-index: 10; border: 1px solid #cdd6de; border-radius: 4px; background: #ffffff; cursor: pointer; font-size: 0.72rem; color: #51616e; padding: 4px 9px;"
                        on:click=move |_| show_legend.set(true)
                    >
                        "Legend"
                    </button>
                }
                .into_any();
            }
            view! {
                <div style="position: absolute; bottom: 12px; right: 12px; z-index: 10; background: #ffffff; border: 1px solid #cdd6de; border-radius: 5px; box-shadow: 0 2px 10px rgba(20, 40, 60, 0.18); padding: 9px 12px; min-width: 150px;">
                    <div style="display: flex; align-items: center; justify-content: space-between; margin-bottom: 6px;">
                        <span style="font-size: 0.72rem; font-weight: 700; color: #24323e; text-transform: uppercase; letter-spacing: 0.04em;">
                            "Population"
                        </span>
                        <button
                            title="Hide legend"
                            style="border: none; background: transparent; cursor: pointer; color: #8795a1; font-size: 0.9rem; line-height: 1; padding: 0 0 0 8px;"
                            on:click=move |_| show_legend.set(false)
                        >
                            "\u{00D7}"
                        </button>
                    </div>
                    {scale::BAND_COLORS
                        .iter()
                        .enumerate()
                        .map(|(i, color)| {
                            view! {
                                <div style="display: flex; align-items: center; gap: 7px; margin-top: 3px;">
                                    <span
                                        style="display: inline-block; width: 14px; height: 14px; border-radius: 3px; border: 1px solid rgba(20, 40, 60, 0.15);"
                                        style:background=*color
                                    />
                                    <span style="font-size: 0.74rem; color: #38454f;">
                                        {band_label(i)}
                                    </span>
                                </div>
                            }
                        })
                        .collect_view()}
                </div>
            }
            .into_any()
        }}
    }
}
