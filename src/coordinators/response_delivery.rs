use std::sync::Arc;
use std::sync::mpsc::{channel, Sender};
use std::thread::{self, JoinHandle};
use crate::coordinators::coordinator_responses::CoordinatorResponse;
use crate::coordinators::ResponseHandler;
use crate::utils::utils_console::scene_debug_print;
use crate::utils::utils_errors::SceneError;

/// Delivery side of the response bus.  Responses pushed into the channel are handed, in order,
/// to the handler on a dedicated thread.  Dropping the delivery closes the channel and joins the
/// thread once every queued response has been delivered.
pub struct ResponseDelivery {
    sender: Option<Sender<CoordinatorResponse>>,
    handle: Option<JoinHandle<()>>
}
impl ResponseDelivery {
    pub fn new(handler: Arc<dyn ResponseHandler>) -> Self {
        let (sender, receiver) = channel::<CoordinatorResponse>();
        let handle = thread::spawn(move || {
            for response in receiver.iter() {
                match response {
                    CoordinatorResponse::World(r) => { handler.on_world_response(r); }
                    CoordinatorResponse::Camera(r) => { handler.on_camera_response(r); }
                }
            }
            scene_debug_print("[ResponseDelivery] channel closed, delivery thread exiting.");
        });

        Self {
            sender: Some(sender),
            handle: Some(handle)
        }
    }
    pub fn deliver(&self, response: CoordinatorResponse) -> Result<(), SceneError> {
        let sender = match &self.sender {
            None => { return Err(SceneError::new_transport_error("ResponseDelivery", "delivery was already shut down.", file!(), line!())); }
            Some(s) => { s }
        };
        return match sender.send(response) {
            Ok(_) => { Ok(()) }
            Err(e) => { Err(SceneError::new_transport_error("ResponseDelivery", &e.to_string(), file!(), line!())) }
        }
    }
}
impl Drop for ResponseDelivery {
    fn drop(&mut self) {
        self.sender = None;
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;
    use crate::coordinators::coordinator_responses::{CameraResponse, WorldResponse};
    use super::*;

    struct Recorder {
        log: Mutex<Vec<String>>
    }
    impl ResponseHandler for Recorder {
        fn on_world_response(&self, response: WorldResponse) {
            self.log.lock().push(format!("{:?}", response));
        }
        fn on_camera_response(&self, response: CameraResponse) {
            self.log.lock().push(format!("{:?}", response));
        }
    }

    #[test]
    fn responses_are_delivered_in_order_before_drop_returns() {
        let recorder = Arc::new(Recorder { log: Mutex::new(vec![]) });
        let delivery = ResponseDelivery::new(recorder.clone());
        for i in 0..20 {
            delivery.deliver(CoordinatorResponse::World(WorldResponse::Info { object_count: i })).unwrap();
        }
        delivery.deliver(CoordinatorResponse::Camera(CameraResponse::Capture { success: true })).unwrap();
        drop(delivery);

        let log = recorder.log.lock();
        assert_eq!(log.len(), 21);
        assert_eq!(log[0], "Info { object_count: 0 }");
        assert_eq!(log[19], "Info { object_count: 19 }");
        assert_eq!(log[20], "Capture { success: true }");
    }
}
