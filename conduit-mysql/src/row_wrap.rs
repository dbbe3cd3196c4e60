use crate::decode_value;
use conduit_core::{RowLabeled, RowNames};
use mysql_async::FromRowError;

pub(crate) struct RowWrap(pub(crate) RowLabeled);

impl mysql_async::prelude::FromRow for RowWrap {
    fn from_row_opt(row: mysql_async::Row) -> Result<Self, FromRowError>
    where
        Self: Sized,
    {
        let columns = row.columns();
        let names: RowNames = columns
            .iter()
            .map(|v| v.name_str().into_owned())
            .collect();
        let mut values = Vec::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            let decoded = row.as_ref(i).map(|v| decode_value(v.clone(), column));
            match decoded {
                Some(Ok(value)) => values.push(value),
                Some(Err(e)) => {
                    log::error!("{:#}", e);
                    return Err(FromRowError(row));
                }
                None => return Err(FromRowError(row)),
            }
        }
        Ok(RowWrap(RowLabeled::new(names, values.into())))
    }
}
