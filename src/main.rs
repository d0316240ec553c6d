#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([900.0, 640.0]),
        ..Default::default()
    };
    eframe::run_native(
        "LearnCheck",
        options,
        Box::new(|_cc| Ok(Box::new(learncheck::QuizApp::from_env()))),
    )
}

#[cfg(target_arch = "wasm32")]
fn main() {
    use eframe::wasm_bindgen::JsCast as _;

    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    let web_options = eframe::WebOptions::default();
    wasm_bindgen_futures::spawn_local(async {
        let document = web_sys::window()
            .expect("No hay window")
            .document()
            .expect("No hay document");
        let canvas = document
            .get_element_by_id("learncheck_canvas")
            .expect("Falta el canvas #learncheck_canvas en index.html")
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .expect("#learncheck_canvas no es un <canvas>");

        eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|_cc| Ok(Box::new(learncheck::QuizApp::from_env()))),
            )
            .await
            .expect("No se pudo arrancar eframe en el navegador");
    });
}
