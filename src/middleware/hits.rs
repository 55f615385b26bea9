use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error,
};
use futures::future::LocalBoxFuture;
use log::debug;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Number of requests served by the static file server since the last reset
#[derive(Debug, Default)]
pub struct FileserverHits {
    count: AtomicU64,
}

impl FileserverHits {
    pub fn increment(&self) -> u64 {
        self.count.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn get(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.count.store(0, Ordering::Relaxed);
    }
}

/// Counts every request that reaches the wrapped service
pub struct HitCounter {
    hits: web::Data<FileserverHits>,
}

impl HitCounter {
    pub fn new(hits: web::Data<FileserverHits>) -> Self {
        Self { hits }
    }
}

impl<S, B> Transform<S, ServiceRequest> for HitCounter
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = HitCounterService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(HitCounterService {
            service: Rc::new(service),
            hits: self.hits.clone(),
        }))
    }
}

pub struct HitCounterService<S> {
    service: Rc<S>,
    hits: web::Data<FileserverHits>,
}

impl<S, B> Service<ServiceRequest> for HitCounterService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let total = self.hits.increment();
        debug!("Fileserver hit #{}: {}", total, req.path());

        let service = self.service.clone();
        Box::pin(async move { service.call(req).await })
    }
}
