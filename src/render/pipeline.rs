use crate::foundation::error::QrCraftResult;
use crate::render::backend::QrRenderer;
use crate::render::request::{IMAGE_MARGIN, RenderRequest};
use crate::state::composition::CompositionState;

/// Derive the render request for `state`. Pure field selection; never fails.
pub fn build_request(state: &CompositionState) -> RenderRequest {
    let style = state.style();
    let logo = state.logo();
    RenderRequest {
        data: state.content().active_payload().to_owned(),
        image: logo.processed_image().cloned(),
        foreground_color: style.foreground_color.clone(),
        background_color: style.background_color.clone(),
        dot_style: style.dot_style,
        eye_style: style.eye_style,
        image_margin: IMAGE_MARGIN,
        image_size_ratio: logo.size_ratio(),
    }
}

/// Build the request for `state` and submit it to `renderer` as a full replace.
///
/// Returns the submitted request together with the renderer's verdict; the request is always
/// structurally valid even when the renderer rejects it.
#[tracing::instrument(level = "debug", skip_all)]
pub fn submit(
    state: &CompositionState,
    renderer: &mut dyn QrRenderer,
) -> (RenderRequest, QrCraftResult<()>) {
    let request = build_request(state);
    let res = renderer.configure(&request);
    (request, res)
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
