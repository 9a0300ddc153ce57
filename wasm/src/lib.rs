//! WebAssembly module for the Store Fulfillment app
//!
//! Runs the fulfillment workflow inside the browser:
//! - `FulfillmentSession` owns one workflow and applies view intents
//! - Line classification and amount helpers for the picking screen
//!
//! The page owns the reactivation timer. When an intent returns a
//! `schedule` timer command the page calls `setTimeout` with the ticket
//! delay and hands the ticket back to `reactivate`; a `cancel` command
//! means any pending timeout should be cleared.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::*;

#[cfg(target_arch = "wasm32")]
type SessionClock = BrowserClock;
#[cfg(not(target_arch = "wasm32"))]
type SessionClock = SystemClock;

/// Wall clock read from `Date.now()`
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserClock;

#[cfg(target_arch = "wasm32")]
impl Clock for BrowserClock {
    fn now_millis(&self) -> i64 {
        js_sys::Date::now() as i64
    }
}

fn log(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&JsValue::from_str(message));
    #[cfg(not(target_arch = "wasm32"))]
    let _ = message;
}

fn js_error(context: &str, err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{}: {}", context, err))
}

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    log("store fulfillment module loaded");
}

/// Session options passed from the page; missing fields fall back to defaults
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionConfig {
    max_displays: Option<u32>,
    popup_interval_seconds: Option<f64>,
    skippable: Option<bool>,
    billed_to: Option<String>,
}

/// Result of one intent as handed back to the page
#[derive(Serialize)]
struct DispatchResult<'a> {
    model: &'a RenderModel,
    timer: TimerCommand,
}

/// One fulfillment workflow bound to a browser page
#[wasm_bindgen]
pub struct FulfillmentSession {
    workflow: Workflow<SessionClock>,
}

#[wasm_bindgen]
impl FulfillmentSession {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<FulfillmentSession, JsValue> {
        let options: SessionConfig = match config_json.as_deref() {
            Some(json) if !json.trim().is_empty() => {
                serde_json::from_str(json).map_err(|e| js_error("Invalid session config JSON", e))?
            }
            _ => SessionConfig::default(),
        };

        let defaults = NotificationConfig::default();
        let config = NotificationConfig::new(
            options.max_displays.unwrap_or(defaults.max_displays),
            options
                .popup_interval_seconds
                .unwrap_or(defaults.popup_interval_seconds),
            options.skippable.unwrap_or(defaults.skippable),
        )
        .map_err(|e| js_error("Invalid session config", e))?;

        let billed_to = options
            .billed_to
            .unwrap_or_else(|| DEFAULT_BILLED_TO.to_string());
        log(&format!(
            "fulfillment session started (max_displays={}, skippable={})",
            config.max_displays, config.skippable
        ));

        Ok(FulfillmentSession {
            workflow: Workflow::with_clock(config, SessionClock::default()).with_billed_to(billed_to),
        })
    }

    /// Apply a tagged intent such as `{"type":"continue_order","items":[...]}`.
    ///
    /// Returns `{ model, timer }` as JSON.
    pub fn dispatch(&mut self, intent_json: &str) -> Result<String, JsValue> {
        let intent: Intent =
            serde_json::from_str(intent_json).map_err(|e| js_error("Invalid intent JSON", e))?;
        self.apply(intent)
    }

    #[wasm_bindgen(js_name = acceptTransfer)]
    pub fn accept_transfer(&mut self) -> Result<String, JsValue> {
        self.apply(Intent::AcceptTransfer)
    }

    #[wasm_bindgen(js_name = skipNotification)]
    pub fn skip_notification(&mut self) -> Result<String, JsValue> {
        self.apply(Intent::SkipNotification)
    }

    #[wasm_bindgen(js_name = exitToHome)]
    pub fn exit_to_home(&mut self) -> Result<String, JsValue> {
        self.apply(Intent::ExitToHome)
    }

    /// Hand back a ticket from a fired timeout. Returns whether the
    /// notification came back.
    pub fn reactivate(&mut self, ticket_json: &str) -> Result<bool, JsValue> {
        let ticket: ReactivationTicket =
            serde_json::from_str(ticket_json).map_err(|e| js_error("Invalid ticket JSON", e))?;
        Ok(self.workflow.reactivate(ticket))
    }

    /// Current render model as JSON
    pub fn render(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.workflow.render()).map_err(|e| js_error("Render failed", e))
    }

    #[wasm_bindgen(js_name = isMandatory)]
    pub fn is_mandatory(&self) -> bool {
        self.workflow.is_mandatory()
    }

    #[wasm_bindgen(js_name = cyclesCompleted)]
    pub fn cycles_completed(&self) -> u32 {
        u32::try_from(self.workflow.cycles_completed()).unwrap_or(u32::MAX)
    }
}

impl FulfillmentSession {
    fn apply(&mut self, intent: Intent) -> Result<String, JsValue> {
        let timer = self
            .workflow
            .apply(intent)
            .map_err(|e| js_error("Intent rejected", e))?;

        let model = self.workflow.render();
        if let Some(popup) = &model.final_popup {
            if timer == TimerCommand::Cancel {
                let lines: Vec<String> = popup
                    .lines()
                    .into_iter()
                    .map(|(label, value)| format!("{}: {}", label, value))
                    .collect();
                log(&format!("fulfillment complete ({})", lines.join(", ")));
            }
        }

        serde_json::to_string(&DispatchResult {
            model: &model,
            timer,
        })
        .map_err(|e| js_error("Render failed", e))
    }
}

/// Split order lines into short, damaged and picked lines
#[wasm_bindgen(js_name = classifyLines)]
pub fn classify_lines(items_json: &str) -> Result<String, JsValue> {
    let items: Vec<OrderLineItem> =
        serde_json::from_str(items_json).map_err(|e| js_error("Invalid items JSON", e))?;
    serde_json::to_string(&classify(&items)).map_err(|e| js_error("Classification failed", e))
}

/// Calculate a line amount (`quantity * mrp`) to two decimals
///
/// Returns `undefined` when the amount is out of range.
#[wasm_bindgen(js_name = calculateLineAmount)]
pub fn calculate_line_amount(quantity: u32, mrp: f64) -> Option<f64> {
    let mrp = Decimal::try_from(mrp).unwrap_or(Decimal::ZERO);
    line_amount(quantity, mrp)
        .map(|amount| amount.round_dp(2))
        .and_then(|amount| amount.to_f64())
}

/// Check one order line; returns the first problem found, if any
#[wasm_bindgen(js_name = validateLine)]
pub fn validate_line(item_json: &str) -> Result<Option<String>, JsValue> {
    let item: OrderLineItem =
        serde_json::from_str(item_json).map_err(|e| js_error("Invalid line JSON", e))?;
    Ok(validate_line_consistency(&item).err().map(str::to_string))
}

/// Check a quantity entered on the picking screen
#[wasm_bindgen(js_name = validatePickQuantity)]
pub fn validate_pick_quantity_js(required: u32, picked: u32) -> Option<String> {
    validate_pick_quantity(required, picked)
        .err()
        .map(str::to_string)
}

/// Check a line can be added to the pick
#[wasm_bindgen(js_name = validatePickable)]
pub fn validate_pickable_js(item_json: &str) -> Result<Option<String>, JsValue> {
    let item: OrderLineItem =
        serde_json::from_str(item_json).map_err(|e| js_error("Invalid line JSON", e))?;
    Ok(validate_pickable(&item).err().map(str::to_string))
}


#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_browser_clock_reads_date_now() {
        let before = js_sys::Date::now() as i64;
        let now = BrowserClock.now_millis();
        assert!(now >= before);
    }

    #[wasm_bindgen_test]
    fn test_rejected_intent_is_an_error() {
        let mut session = FulfillmentSession::new(None).unwrap();
        assert!(session.dispatch(r#"{"type":"continue_transfer"}"#).is_err());
    }
}
