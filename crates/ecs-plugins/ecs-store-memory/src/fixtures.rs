//! # Seed Fixtures
//!
//! Static demo data used to populate the store at startup. Ids are short
//! numerals on purpose: the relations below reference each other, and the
//! demo scenarios in the UI expect this exact starting state.

use chrono::{DateTime, TimeZone, Utc};
use ecs_core::models::*;

/// Everything the store needs for a seeded start.
#[derive(Debug, Clone, Default)]
pub struct SeedData {
    pub users: Vec<User>,
    pub posts: Vec<Post>,
    pub requests: Vec<Request>,
    pub articles: Vec<Article>,
    pub comments: Vec<Comment>,
    pub exchanges: Vec<Exchange>,
}

fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

/// Builds the full demo dataset: 3 users, 4 posts, 3 requests, 6 articles,
/// 4 comments and 2 completed exchanges.
pub fn seed() -> SeedData {
    SeedData {
        users: users(),
        posts: posts(),
        requests: requests(),
        articles: articles(),
        comments: comments(),
        exchanges: exchanges(),
    }
}

fn users() -> Vec<User> {
    vec![
        User {
            id: "1".into(),
            name: "Rizky Yusmansyah".into(),
            email: "rizky@example.com".into(),
            location: "Banda Aceh".into(),
            favorite_plants: vec!["Tomat".into(), "Cabai".into()],
            profile_image: Some("/assets/images/rizky.jpg".into()),
            created_at: day(2023, 1, 15),
        },
        User {
            id: "2".into(),
            name: "Fadli Ahmad".into(),
            email: "fadli@example.com".into(),
            location: "Banda Aceh".into(),
            favorite_plants: vec!["Bayam".into(), "Kangkung".into()],
            profile_image: Some("/assets/images/fadli.jpeg".into()),
            created_at: day(2023, 2, 20),
        },
        User {
            id: "3".into(),
            name: "Andi Wijaya".into(),
            email: "andi@example.com".into(),
            location: "Surabaya".into(),
            favorite_plants: vec!["Jagung".into(), "Kacang Panjang".into()],
            profile_image: Some("/assets/images/andi.jpg".into()),
            created_at: day(2023, 3, 10),
        },
    ]
}

fn posts() -> Vec<Post> {
    vec![
        Post {
            id: "1".into(),
            user_id: "1".into(),
            title: "Bibit Tomat Cherry Organik".into(),
            kind: PostKind::Seed,
            quantity: 20,
            location: "Jakarta Selatan".into(),
            images: vec!["/assets/images/tomat-cherry.jpg".into()],
            description: "Bibit tomat cherry hasil budidaya sendiri. Bebas pestisida dan sudah siap tanam.".into(),
            status: PostStatus::Available,
            created_at: day(2023, 6, 10),
            updated_at: day(2023, 6, 10),
        },
        Post {
            id: "2".into(),
            user_id: "2".into(),
            title: "Cabai Rawit Surplus".into(),
            kind: PostKind::Harvest,
            quantity: 500,
            location: "Bandung".into(),
            images: vec!["/assets/images/cabai-rawit.jpg".into()],
            description: "Hasil panen cabai rawit yang berlebih. Sangat pedas dan segar.".into(),
            status: PostStatus::Available,
            created_at: day(2023, 6, 18),
            updated_at: day(2023, 6, 18),
        },
        Post {
            id: "3".into(),
            user_id: "3".into(),
            title: "Bibit Jagung Manis".into(),
            kind: PostKind::Seed,
            quantity: 30,
            location: "Surabaya".into(),
            images: vec!["/assets/images/jagung.jpg".into()],
            description: "Bibit jagung manis varietas unggul. Hasil panen dalam 60-70 hari.".into(),
            status: PostStatus::Completed,
            created_at: day(2023, 5, 25),
            updated_at: day(2023, 6, 30),
        },
        Post {
            id: "4".into(),
            user_id: "1".into(),
            title: "Kangkung Siap Panen".into(),
            kind: PostKind::Harvest,
            quantity: 2,
            location: "Jakarta Timur".into(),
            images: vec!["/assets/images/kangkung.jpg".into()],
            description: "Kangkung hidroponik segar, baru dipanen pagi ini. Dalam satuan ikat.".into(),
            status: PostStatus::Available,
            created_at: day(2023, 7, 1),
            updated_at: day(2023, 7, 1),
        },
    ]
}

fn requests() -> Vec<Request> {
    vec![
        Request {
            id: "1".into(),
            user_id: "3".into(),
            plant_name: "Bibit Bayam".into(),
            location: "Surabaya".into(),
            reason: "Ingin mencoba menanam bayam di lahan kosong samping rumah.".into(),
            category: Some("sayuran".into()),
            quantity: Some(10),
            status: RequestStatus::Open,
            created_at: day(2023, 7, 2),
            updated_at: day(2023, 7, 2),
        },
        Request {
            id: "2".into(),
            user_id: "1".into(),
            plant_name: "Bibit Terong Ungu".into(),
            location: "Jakarta".into(),
            reason: "Mencari bibit terong unggul untuk ditanam di kebun komunitas.".into(),
            category: Some("sayuran".into()),
            quantity: Some(15),
            status: RequestStatus::Open,
            created_at: day(2023, 7, 5),
            updated_at: day(2023, 7, 5),
        },
        Request {
            id: "3".into(),
            user_id: "2".into(),
            plant_name: "Daun Mint".into(),
            location: "Bandung".into(),
            reason: "Butuh daun mint segar untuk eksperimen membuat teh herbal.".into(),
            category: Some("herbal".into()),
            quantity: Some(5),
            status: RequestStatus::Fulfilled,
            created_at: day(2023, 6, 25),
            updated_at: day(2023, 7, 1),
        },
    ]
}

fn articles() -> Vec<Article> {
    vec![
        Article {
            id: "1".into(),
            user_id: "2".into(),
            title: "Cara Mudah Menanam Tomat di Pot".into(),
            content: "Menanam tomat di pot sangat mudah dilakukan bahkan untuk pemula. Berikut langkah-langkahnya:\n\n1. Pilih pot berukuran minimal 30 cm diameter dengan lubang drainase.\n2. Isi dengan campuran tanah, kompos, dan pupuk organik.\n3. Tanam bibit tomat sedalam 1-2 cm dan beri jarak antar tanaman.\n4. Letakkan di tempat yang terkena sinar matahari minimal 6 jam sehari.\n\nPanen dalam 60-80 hari tergantung varietas. Selamat mencoba!".into(),
            image: Some("/assets/images/artikel-tomat.jpg".into()),
            category: Some("Budidaya".into()),
            tags: vec!["tomat".into(), "pot".into(), "pemula".into(), "panduan".into()],
            created_at: day(2023, 6, 15),
            updated_at: day(2023, 6, 15),
        },
        Article {
            id: "2".into(),
            user_id: "1".into(),
            title: "Membuat Pupuk Kompos dari Limbah Dapur".into(),
            content: "Pupuk kompos bisa dibuat dari limbah dapur dengan mudah. Ikuti cara berikut:\n\n1. Siapkan wadah kompos dengan lubang ventilasi.\n2. Kumpulkan limbah organik seperti sisa sayuran, kulit buah, dan ampas kopi.\n3. Aduk campuran setiap minggu untuk aerasi.\n\nDalam 2-3 bulan, kompos siap digunakan untuk menyuburkan tanaman Anda secara alami.".into(),
            image: Some("/assets/images/artikel-kompos.jpg".into()),
            category: Some("Pupuk Organik".into()),
            tags: vec!["kompos".into(), "daur ulang".into(), "pupuk".into(), "organik".into()],
            created_at: day(2023, 7, 1),
            updated_at: day(2023, 7, 3),
        },
        Article {
            id: "3".into(),
            user_id: "3".into(),
            title: "Tips Mengatasi Hama Tanaman Secara Organik".into(),
            content: "Mengatasi hama tanaman tidak harus dengan pestisida kimia. Berikut cara organik yang bisa dicoba:\n\n1. Air sabun: semprotkan ke tanaman untuk mengusir kutu daun dan tungau.\n2. Bawang putih: rendam semalam, saring dan semprotkan untuk mencegah berbagai hama.\n3. Companion planting: tanam kemangi di dekat tomat untuk mengusir hama tertentu.\n\nMetode-metode ini lebih ramah lingkungan dan aman untuk konsumsi.".into(),
            image: Some("/assets/images/artikel-hama.jpg".into()),
            category: Some("Perawatan".into()),
            tags: vec!["hama".into(), "organik".into(), "pengendalian".into(), "alami".into()],
            created_at: day(2023, 6, 28),
            updated_at: day(2023, 6, 28),
        },
        Article {
            id: "4".into(),
            user_id: "2".into(),
            title: "Panduan Berkebun Vertikal untuk Ruang Terbatas".into(),
            content: "Berkebun vertikal adalah solusi tepat bagi Anda yang memiliki keterbatasan ruang. Berikut panduannya:\n\n1. Pilih lokasi yang mendapat sinar matahari 4-6 jam per hari.\n2. Tentukan sistem yang sesuai: pot gantung, rak bertingkat, atau hidroponik vertikal.\n3. Pilih tanaman yang tepat: herbal, selada, atau stroberi.\n\nBerkebun vertikal menghemat ruang sekaligus menambah nilai estetika tempat tinggal Anda.".into(),
            image: Some("/assets/images/artikel-vertikal.jpg".into()),
            category: Some("Teknik Tanam".into()),
            tags: vec!["vertikal".into(), "urban farming".into(), "ruang terbatas".into()],
            created_at: day(2023, 7, 12),
            updated_at: day(2023, 7, 12),
        },
        Article {
            id: "5".into(),
            user_id: "1".into(),
            title: "Teknik Menyemai Benih untuk Hasil Optimal".into(),
            content: "Penyemaian benih yang benar menentukan keberhasilan tumbuh kembang tanaman Anda:\n\n1. Pilih media semai yang steril dan ringan, kombinasi cocopeat dan perlite ideal.\n2. Rendam benih beberapa jam sebelum disemai untuk mempercepat perkecambahan.\n3. Transplantasi dengan hati-hati saat bibit memiliki 2-4 set daun sejati.\n\nKesabaran adalah kunci dalam proses penyemaian.".into(),
            image: Some("/assets/images/artikel-semai.jpg".into()),
            category: Some("Pembibitan".into()),
            tags: vec!["benih".into(), "penyemaian".into(), "bibit".into(), "pembibitan".into()],
            created_at: day(2023, 6, 20),
            updated_at: day(2023, 6, 22),
        },
        Article {
            id: "6".into(),
            user_id: "3".into(),
            title: "Menanam Sayuran Hidroponik untuk Pemula".into(),
            content: "Hidroponik adalah teknik menanam tanpa tanah yang semakin populer. Panduan untuk pemula:\n\n1. Pilih sistem sederhana: rakit apung atau wick system.\n2. Mulai dengan tanaman mudah seperti selada, kangkung, atau bayam.\n3. Periksa pH larutan nutrisi secara berkala, idealnya 5.5-6.5.\n\nHidroponik memberikan hasil yang lebih cepat dan bersih dibandingkan bercocok tanam konvensional.".into(),
            image: Some("/assets/images/artikel-hidroponik.jpg".into()),
            category: Some("Hidroponik".into()),
            tags: vec!["hidroponik".into(), "tanpa tanah".into(), "urban farming".into()],
            created_at: day(2023, 7, 8),
            updated_at: day(2023, 7, 10),
        },
    ]
}

fn comments() -> Vec<Comment> {
    vec![
        Comment {
            id: "1".into(),
            user_id: "2".into(),
            parent_id: "1".into(),
            parent_kind: ParentKind::Post,
            content: "Apakah bibit tomat ini masih tersedia?".into(),
            created_at: at(2023, 6, 15, 10, 30),
        },
        Comment {
            id: "2".into(),
            user_id: "1".into(),
            parent_id: "1".into(),
            parent_kind: ParentKind::Post,
            content: "Iya, masih tersedia. Silakan hubungi saya.".into(),
            created_at: at(2023, 6, 15, 11, 45),
        },
        Comment {
            id: "3".into(),
            user_id: "3".into(),
            parent_id: "2".into(),
            parent_kind: ParentKind::Post,
            content: "Saya tertarik dengan cabai rawitnya. Bisa tukar dengan bibit kangkung saya.".into(),
            created_at: at(2023, 6, 20, 9, 15),
        },
        Comment {
            id: "4".into(),
            user_id: "2".into(),
            parent_id: "1".into(),
            parent_kind: ParentKind::Request,
            content: "Saya punya beberapa bibit bayam yang bisa saya bagikan.".into(),
            created_at: at(2023, 7, 5, 14, 20),
        },
    ]
}

fn exchanges() -> Vec<Exchange> {
    vec![
        Exchange {
            id: "1".into(),
            post_id: Some("3".into()),
            request_id: None,
            giver_id: "3".into(),
            partner_id: "1".into(),
            plant_name: "Bibit Jagung Manis".into(),
            date: day(2023, 6, 30),
            notes: "Ditukar dengan bibit tomat dari Rizky.".into(),
            kind: ExchangeKind::Post,
        },
        Exchange {
            id: "2".into(),
            post_id: None,
            request_id: Some("3".into()),
            giver_id: "2".into(),
            partner_id: "1".into(),
            plant_name: "Daun Mint".into(),
            date: day(2023, 7, 1),
            notes: "Permintaan terpenuhi oleh Fadli yang memiliki kebun mint.".into(),
            kind: ExchangeKind::Request,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_counts_match_the_demo_dataset() {
        let data = seed();
        assert_eq!(data.users.len(), 3);
        assert_eq!(data.posts.len(), 4);
        assert_eq!(data.requests.len(), 3);
        assert_eq!(data.articles.len(), 6);
        assert_eq!(data.comments.len(), 4);
        assert_eq!(data.exchanges.len(), 2);
    }

    #[test]
    fn seed_relations_are_consistent() {
        let data = seed();
        let user_ids: Vec<&str> = data.users.iter().map(|u| u.id.as_str()).collect();

        for post in &data.posts {
            assert!(user_ids.contains(&post.user_id.as_str()));
        }
        for comment in &data.comments {
            assert!(user_ids.contains(&comment.user_id.as_str()));
            let parent_exists = match comment.parent_kind {
                ParentKind::Post => data.posts.iter().any(|p| p.id == comment.parent_id),
                ParentKind::Request => data.requests.iter().any(|r| r.id == comment.parent_id),
            };
            assert!(parent_exists, "dangling comment {}", comment.id);
        }
        for exchange in &data.exchanges {
            // Exactly one side set, matching the kind.
            match exchange.kind {
                ExchangeKind::Post => {
                    assert!(exchange.post_id.is_some() && exchange.request_id.is_none())
                }
                ExchangeKind::Request => {
                    assert!(exchange.request_id.is_some() && exchange.post_id.is_none())
                }
            }
        }
    }

    #[test]
    fn seed_emails_are_unique() {
        let data = seed();
        for (i, a) in data.users.iter().enumerate() {
            for b in &data.users[i + 1..] {
                assert_ne!(a.email, b.email);
            }
        }
    }
}
