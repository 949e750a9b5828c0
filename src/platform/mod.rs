//! Platform glue
//!
//! Handles the browser side of things the core only sees through traits:
//! - Page-relative asset URLs
//! - Text fetch for the ASCII asset
//! - The 2D canvas the ASCII frames are drawn onto
//! - Wall clock

use crate::consts::ASCII_ASSET;

/// URL of the ASCII asset for a page path: a trailing `index.html` and a
/// trailing `/` are dropped, then the asset name is appended.
pub fn asset_url(pathname: &str) -> String {
    let base = pathname.strip_suffix("index.html").unwrap_or(pathname);
    let base = base.strip_suffix('/').unwrap_or(base);
    format!("{}/{}", base, ASCII_ASSET)
}

#[cfg(target_arch = "wasm32")]
pub use web::*;

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Response};

    use crate::consts::{
        RASTER_FONT_PX, RASTER_HEIGHT, RASTER_LINE_STEP, RASTER_ORIGIN, RASTER_WIDTH,
    };
    use crate::sim::{PlaybackError, TextSurface};

    fn js_error(err: JsValue) -> PlaybackError {
        PlaybackError::Network(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
    }

    /// Seconds since page load (monotonic)
    pub fn now_secs() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now() / 1000.0)
            .unwrap_or_else(|| js_sys::Date::now() / 1000.0)
    }

    /// URL of the ASCII asset for the current page
    pub fn page_asset_url() -> String {
        let pathname = web_sys::window()
            .and_then(|w| w.location().pathname().ok())
            .unwrap_or_default();
        super::asset_url(&pathname)
    }

    /// GET `url` and return the body as text. Non-2xx statuses are errors.
    pub async fn fetch_text(url: &str) -> Result<String, PlaybackError> {
        let window = web_sys::window().ok_or_else(|| PlaybackError::Network("no window".into()))?;

        let response: Response = JsFuture::from(window.fetch_with_str(url))
            .await
            .map_err(js_error)?
            .dyn_into()
            .map_err(js_error)?;

        if !response.ok() {
            return Err(PlaybackError::Fetch {
                status: response.status(),
            });
        }

        let text = JsFuture::from(response.text().map_err(js_error)?)
            .await
            .map_err(js_error)?;
        text.as_string()
            .ok_or_else(|| PlaybackError::Network("response body is not text".into()))
    }

    /// Off-screen 2D canvas holding the current ASCII frame
    pub struct CanvasTextSurface {
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        dirty: bool,
    }

    impl CanvasTextSurface {
        pub fn new() -> Result<Self, JsValue> {
            let document = web_sys::window()
                .and_then(|w| w.document())
                .ok_or_else(|| JsValue::from_str("no document"))?;

            let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
            canvas.set_width(RASTER_WIDTH);
            canvas.set_height(RASTER_HEIGHT);

            let ctx: CanvasRenderingContext2d = canvas
                .get_context("2d")?
                .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
                .dyn_into()?;

            Ok(Self {
                canvas,
                ctx,
                dirty: false,
            })
        }

        pub fn size(&self) -> (u32, u32) {
            (self.canvas.width(), self.canvas.height())
        }

        /// Return and reset the dirty flag
        pub fn take_dirty(&mut self) -> bool {
            std::mem::take(&mut self.dirty)
        }

        /// RGBA8 pixels of the whole raster, row-major
        pub fn pixels(&self) -> Option<Vec<u8>> {
            let (w, h) = self.size();
            match self.ctx.get_image_data(0.0, 0.0, w as f64, h as f64) {
                Ok(data) => Some(data.data().0),
                Err(e) => {
                    log::warn!("Raster read failed: {:?}", e);
                    None
                }
            }
        }
    }

    impl TextSurface for CanvasTextSurface {
        fn clear(&mut self) {
            let (w, h) = self.size();
            self.ctx.set_fill_style_str("black");
            self.ctx.fill_rect(0.0, 0.0, w as f64, h as f64);
        }

        fn draw_line(&mut self, row: usize, text: &str) {
            self.ctx.set_fill_style_str("lime");
            self.ctx
                .set_font(&format!("{}px monospace", RASTER_FONT_PX));
            let x = RASTER_ORIGIN.0 as f64;
            let y = (RASTER_ORIGIN.1 + row as f32 * RASTER_LINE_STEP) as f64;
            if let Err(e) = self.ctx.fill_text(text, x, y) {
                log::warn!("fill_text failed: {:?}", e);
            }
        }

        fn mark_dirty(&mut self) {
            self.dirty = true;
        }
    }
}
