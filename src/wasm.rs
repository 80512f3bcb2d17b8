//! WASM bindings for the Kirchhoff oracle.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmOracle } from 'kirchhoff_oracle';
//!
//! await init();
//!
//! const oracle = new WasmOracle(1e-4, 1e-8);
//! const answer = oracle.solve("1 -- 2, 10; 12V\n2 -- 1, 20;\n");
//! const diff = oracle.compare(resultText, answer);
//! if (diff !== "") console.log(diff);
//! ```

use wasm_bindgen::prelude::*;

use crate::compare::{compare, Tolerances};
use crate::error::OracleError;
use crate::text;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js(e: OracleError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// WASM-compatible oracle.
#[wasm_bindgen]
pub struct WasmOracle {
    tolerances: Tolerances,
}

#[wasm_bindgen]
impl WasmOracle {
    /// Create an oracle with the given comparison tolerances.
    ///
    /// # Arguments
    /// * `relative` - Relative tolerance (default elsewhere: 1e-4)
    /// * `absolute` - Absolute tolerance in amperes (default elsewhere: 1e-8)
    #[wasm_bindgen(constructor)]
    pub fn new(relative: f64, absolute: f64) -> Result<WasmOracle, JsValue> {
        let tolerances = Tolerances::new(relative, absolute).map_err(to_js)?;
        Ok(WasmOracle { tolerances })
    }

    /// Solve test-case text, returning answer text.
    ///
    /// Fails for malformed input and for networks without a unique solution.
    #[wasm_bindgen]
    pub fn solve(&self, case: &str) -> Result<String, JsValue> {
        crate::answer_for(case).map_err(to_js)
    }

    /// Compare result text with answer text.
    ///
    /// Returns an empty string on a match and the diagnostic otherwise.
    /// Unparseable result text is reported as a mismatch.
    #[wasm_bindgen]
    pub fn compare(&self, result: &str, answer: &str) -> Result<String, JsValue> {
        let answer = text::parse_answer(answer).map_err(to_js)?;
        let result = match text::parse_answer(result) {
            Ok(result) => result,
            Err(e) => return Ok(format!("unreadable result: {}", e)),
        };
        Ok(compare(&result, &answer, &self.tolerances).diagnostic())
    }
}
