//! JS interop glue shared by the browser adapters, with a non-wasm shim.

/// Error reported by every adapter call on non-wasm targets.
#[cfg_attr(target_arch = "wasm32", allow(dead_code))]
pub(crate) fn unsupported(feature: &str) -> String {
    format!("{feature} is only available when compiled for wasm32")
}

#[cfg(target_arch = "wasm32")]
mod imp {
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;

    #[wasm_bindgen(inline_js = r#"
export function jsIntranetAddress() {
  return new Promise((resolve) => {
    const Peer = window.RTCPeerConnection || window.webkitRTCPeerConnection;
    if (!Peer) {
      resolve(null);
      return;
    }
    let pc;
    try {
      pc = new Peer({ iceServers: [] });
    } catch (_) {
      resolve(null);
      return;
    }
    const finish = (value) => {
      try {
        pc.close();
      } catch (_) {}
      resolve(value);
    };
    pc.onicecandidate = (ice) => {
      if (!ice || !ice.candidate || !ice.candidate.candidate) {
        return;
      }
      const parts = ice.candidate.candidate.split(' ');
      finish(parts[4] || null);
    };
    try {
      pc.createDataChannel('');
      pc.createOffer()
        .then((offer) => pc.setLocalDescription(offer))
        .catch(() => finish(null));
    } catch (_) {
      finish(null);
    }
  });
}
"#)]
    extern "C" {
        #[wasm_bindgen(js_name = jsIntranetAddress)]
        fn js_intranet_address() -> js_sys::Promise;
    }

    pub async fn intranet_address() -> Result<String, String> {
        let value = JsFuture::from(js_intranet_address())
            .await
            .map_err(js_error_to_string)?;
        value
            .as_string()
            .ok_or_else(|| "peer connection produced no usable ICE candidate".to_string())
    }

    pub fn js_error_to_string(err: JsValue) -> String {
        if let Some(text) = err.as_string() {
            return text;
        }
        if let Ok(message) = js_sys::Reflect::get(&err, &JsValue::from_str("message")) {
            if let Some(text) = message.as_string() {
                return text;
            }
        }
        format!("{err:?}")
    }
}

#[cfg(target_arch = "wasm32")]
pub(crate) use imp::{intranet_address, js_error_to_string};

#[cfg(not(target_arch = "wasm32"))]
pub(crate) async fn intranet_address() -> Result<String, String> {
    Err(unsupported("the ICE address probe"))
}
