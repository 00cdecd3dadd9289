use std::sync::Arc;

use chrono::NaiveDate;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use recibo_auth::{FixedIdentity, IdentityProvider, Session};
use recibo_core::UserId;
use recibo_infra::InMemoryTableStore;
use recibo_ledger::{DeductionDraft, LedgerStore, ReceiptDraft};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("failed to build runtime")
}

async fn seeded_ledger(
    receipts: usize,
    deductions_per_receipt: usize,
) -> (LedgerStore<Arc<InMemoryTableStore>>, Session) {
    let ledger = LedgerStore::new(Arc::new(InMemoryTableStore::new()));
    let session = FixedIdentity::signed_in(UserId::new())
        .session()
        .await
        .expect("signed in");

    for i in 0..receipts {
        let receipt = ledger
            .create_receipt(
                &session,
                ReceiptDraft {
                    receipt_number: format!("2024-{i:04}"),
                    date: NaiveDate::from_ymd_opt(2024, 1, 1 + (i % 28) as u32),
                    client: Some(format!("client-{i}")),
                    total_value: 1000.0,
                    description: None,
                },
            )
            .await
            .expect("create receipt");

        for _ in 0..deductions_per_receipt {
            ledger
                .add_deduction(
                    &session,
                    DeductionDraft {
                        receipt_id: receipt.id,
                        date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                        value: 10.0,
                        description: None,
                    },
                )
                .await
                .expect("add deduction");
        }
    }

    (ledger, session)
}

fn bench_list_with_stats(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("list_receipts_with_stats");

    for receipts in [10usize, 100, 500] {
        let (ledger, _session) = rt.block_on(seeded_ledger(receipts, 5));

        group.throughput(Throughput::Elements(receipts as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(receipts),
            &receipts,
            |b, _| {
                b.iter(|| {
                    let listing = rt
                        .block_on(ledger.list_receipts_with_stats())
                        .expect("listing");
                    black_box(listing)
                })
            },
        );
    }

    group.finish();
}

fn bench_add_deduction(c: &mut Criterion) {
    let rt = runtime();

    c.bench_function("add_deduction_partial", |b| {
        // One big receipt; each iteration appends a tiny deduction, so the
        // balance check scans a growing deduction set.
        let (ledger, session) = rt.block_on(seeded_ledger(1, 0));
        let receipt_id = rt
            .block_on(ledger.list_receipts_with_stats())
            .expect("listing")[0]
            .receipt
            .id;

        b.iter(|| {
            let result = rt.block_on(ledger.add_deduction(
                &session,
                DeductionDraft {
                    receipt_id,
                    date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                    value: 0.01,
                    description: None,
                },
            ));
            // The receipt eventually settles; rejected appends are fine to
            // keep timing.
            black_box(result).ok();
        })
    });
}

criterion_group!(benches, bench_list_with_stats, bench_add_deduction);
criterion_main!(benches);
