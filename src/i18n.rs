// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Text {
    NoDescription,
    Uncategorized,
    Income,
    Expense,
    Balance,
    InsightFailed,
    InsightMissingKey,
    InsightNoData,
    Hidden,
}

pub fn t(lang: Language, key: Text) -> &'static str {
    match lang {
        Language::En => match key {
            Text::NoDescription => "No description",
            Text::Uncategorized => "Other",
            Text::Income => "Income",
            Text::Expense => "Expense",
            Text::Balance => "Balance",
            Text::InsightFailed => "Sorry, the AI insight could not be generated right now. Please try again later.",
            Text::InsightMissingKey => "AI insight is unavailable: no API key is configured.",
            Text::InsightNoData => "Add a few transactions first so there is something to analyse.",
            Text::Hidden => "••••••",
        },
        Language::Id => match key {
            Text::NoDescription => "Tanpa deskripsi",
            Text::Uncategorized => "Lainnya",
            Text::Income => "Pemasukan",
            Text::Expense => "Pengeluaran",
            Text::Balance => "Saldo",
            Text::InsightFailed => "Maaf, insight AI belum bisa dibuat saat ini. Silakan coba lagi nanti.",
            Text::InsightMissingKey => "Insight AI tidak tersedia: API key belum dikonfigurasi.",
            Text::InsightNoData => "Tambahkan beberapa transaksi dulu agar ada yang bisa dianalisis.",
            Text::Hidden => "••••••",
        },
    }
}
