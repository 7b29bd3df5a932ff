// Configuration writes
//
// The device accepts plain form posts. Field selection for the port
// state form depends on the hardware model and is decided by the caller;
// this module only submits.

use tracing::debug;

use crate::client::{Form, SwitchClient, paths};
use crate::error::Error;

impl SwitchClient {
    /// Submit a prepared port-state form.
    ///
    /// `POST /port_state_set.cgi`
    pub async fn set_port_state(&self, form: &Form) -> Result<(), Error> {
        debug!(fields = form.len(), "submitting port state");
        self.post(paths::PORT_STATE_SET, form).await?;
        Ok(())
    }

    /// Toggle LED eco mode.
    ///
    /// `POST /led_cfg.cgi` with `led_state_f=0|1`
    pub async fn set_led_eco(&self, on: bool) -> Result<(), Error> {
        debug!(on, "submitting LED eco state");
        let form: Form = vec![("led_state_f".into(), u8::from(on).to_string())];
        self.post(paths::LED_CONFIG, &form).await?;
        Ok(())
    }
}
