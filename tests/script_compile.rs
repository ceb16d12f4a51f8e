use starling_engine::script::ScriptBridge;

#[test]
fn hud_script_compiles() {
    let bridge = ScriptBridge::new("assets/scripts/hud.rhai");
    assert!(bridge.loaded(), "hud.rhai should compile: {:?}", bridge.last_error());
    assert!(bridge.has_update_entry());
    assert!(bridge.has_render_entry());
}

#[test]
fn pulse_script_compiles_without_a_render_hook() {
    let bridge = ScriptBridge::new("assets/scripts/pulse.rhai");
    assert!(bridge.loaded(), "pulse.rhai should compile: {:?}", bridge.last_error());
    assert!(bridge.has_update_entry());
    assert!(!bridge.has_render_entry());
}
