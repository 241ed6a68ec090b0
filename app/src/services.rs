//! Every canteen operation is a request value handed to the service that
//! owns the matching record family.
use anyhow::Result;

pub trait Request {
    type Resp;
}

/// Reads only. A query never writes to the store, so it never triggers a
/// change notification.
pub trait Queryable<Req>
where
    Req: Request,
{
    fn query(&self, req: Req) -> Result<Req::Resp>;
}

/// May write. Validation happens before the first write, so a command that
/// fails leaves the store as it found it.
pub trait Commandable<Req>
where
    Req: Request,
{
    fn execute(&self, req: Req) -> Result<Req::Resp>;
}
